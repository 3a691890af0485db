pub mod admin_service;
pub mod auth;
pub mod booking_service;
pub mod geocoding_service;
pub mod jwt;
pub mod notification_service;
pub mod property_service;
pub mod report_service;
pub mod storage_service;
pub mod user_service;
pub mod verification_service;

/// One page of results from a paginated listing.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, limit: u32, total_count: i64) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            ((total_count + limit as i64 - 1) / limit as i64) as u32
        };
        Self {
            items,
            page,
            limit,
            total_count,
            total_pages,
        }
    }
}

/// Normalizes page/limit and returns the SQL offset.
pub(crate) fn page_window(page: u32, limit: u32) -> (u32, u32, i64) {
    let page = page.max(1);
    let limit = limit.clamp(1, 100);
    let offset = ((page - 1) as i64) * limit as i64;
    (page, limit, offset)
}
