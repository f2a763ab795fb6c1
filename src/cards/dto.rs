use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateCardRequest {
    pub name: String,
    pub link: String,
}
