//! Simple inspector for Directed Edge items.
//!
//! ```text
//! cargo run --example inspect_item -- path/to/item.xml
//! cargo run --example inspect_item -- --remote <database> <item-id>
//! ```
//!
//! Remote mode reads the endpoint from `DIRECTEDEDGE_URL`.

use std::fs;

use directededge::{ClientOptions, Database, Field, ItemDocument, Link, parse_item};

fn format_link(link: &Link) -> String {
    let mut out = link.target.clone();
    if let Some(t) = &link.options.link_type {
        out.push_str(&format!(" type={}", t));
    }
    if let Some(w) = link.options.weight {
        out.push_str(&format!(" weight={}", w));
    }
    out
}

fn print_document(doc: &ItemDocument) {
    println!("\n=== Item Info ===");
    println!("ID: {}", doc.id);
    for field in Field::ALL {
        println!("{}: {}", field, doc.len(field));
    }

    println!("\n=== Links ===");
    for link in &doc.links {
        println!("  {}", format_link(link));
    }

    println!("\n=== Tags ===");
    for tag in &doc.tags {
        println!("  {}", tag);
    }

    println!("\n=== Properties ===");
    for p in &doc.properties {
        let preview: String = p.value.chars().take(80).collect();
        if p.value.chars().count() > 80 {
            println!("  {} = \"{}...\"", p.name, preview);
        } else {
            println!("  {} = \"{}\"", p.name, preview);
        }
    }

    println!("\n=== Preselected ===");
    for id in &doc.preselected {
        println!("  {}", id);
    }

    println!("\n=== Blacklisted ===");
    for id in &doc.blacklisted {
        println!("  {}", id);
    }
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let doc = match args.as_slice() {
        [flag, database, id] if flag == "--remote" => {
            let options = ClientOptions::from_env();
            println!("Fetching {}/{} from {}", database, id, options.base_url);
            let db = Database::connect(database.as_str(), &options).expect("Failed to connect");
            let mut item = db.item(id);
            item.load().expect("Failed to load item");
            item.snapshot(directededge::Snapshot::Cached)
        }
        [path] => {
            println!("Reading: {}", path);
            let data = fs::read_to_string(path).expect("Failed to read file");
            println!("File size: {} bytes", data.len());
            parse_item(&data).expect("Failed to decode")
        }
        _ => {
            eprintln!("usage: inspect_item <file.xml> | --remote <database> <item-id>");
            std::process::exit(2);
        }
    };

    print_document(&doc);
}
