use pipeline::Listing;
use serde::Serialize;

// Response models
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingsPayload {
    pub count: usize,
    pub listings: Vec<Listing>,
}

impl ListingsPayload {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            count: listings.len(),
            listings,
        }
    }
}
