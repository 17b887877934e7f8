pub fn message_endpoint(id: &str) -> String {
    format!("/gmail/v1/users/me/messages/{id}")
}

pub fn list_endpoint() -> &'static str {
    "/gmail/v1/users/me/messages"
}

pub fn get_query() -> Vec<(String, String)> {
    vec![("format".to_string(), "full".to_string())]
}

pub fn search_query(query: &str) -> Vec<(String, String)> {
    vec![("q".to_string(), query.to_string())]
}

pub fn list_query(limit: u32) -> Vec<(String, String)> {
    vec![("maxResults".to_string(), limit.to_string())]
}
