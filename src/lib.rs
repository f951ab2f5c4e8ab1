pub mod assistant {
    pub mod api;
    pub mod model;
    pub mod session;
}
pub mod config {
    pub mod env_loader;
    pub mod model;
}
pub mod events {
    pub mod api;
    pub mod browser;
    pub mod dto;
    pub mod links;
    pub mod model;
}
pub mod favorites;
pub mod gemini {
    pub mod api;
    pub mod dto;
    pub mod model;
}
pub mod geolocation;
pub mod loading;
pub mod places {
    pub mod api;
    pub mod explorer;
}
pub mod share;
pub mod storage;
pub mod tracing;
