//! Wire constants and decoding limits.

/// Name of the document root element.
pub const ROOT_ELEMENT: &str = "directededge";

/// Value of the root element's `version` attribute.
pub const XML_VERSION: &str = "0.1";

/// Element wrapping a single item inside the root.
pub const ITEM_ELEMENT: &str = "item";

/// Largest response body the decoder will accept (16 MiB).
pub const MAX_DOCUMENT_SIZE: usize = 16 * 1024 * 1024;

/// Default REST endpoint; the database name is appended as the first segment.
pub const DEFAULT_BASE_URL: &str = "https://webservices.directededge.com/api/v1/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Query parameter selecting the merge behaviour of a POST.
pub const UPDATE_METHOD_PARAM: &str = "update_method";
