macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

/// Versioned API route definitions shared by the server and its clients
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod images {
        pub const COLLECTION: &str = v1_path!("/images");
        pub const ITEM: &str = v1_path!("/images/{id}");
        pub const REORDER: &str = v1_path!("/images/reorder");
        pub const ANNOTATE: &str = v1_path!("/images/{id}/annotate");
    }
}

/// Unversioned routes kept for the original front-end
pub mod legacy {
    pub const INDEX: &str = "/";
    pub const IMAGES: &str = "/images";
    pub const IMAGE: &str = "/images/{id}";
    pub const UPLOAD: &str = "/upload";
    pub const REORDER: &str = "/reorder";
    pub const ANNOTATE: &str = "/annotate";
}

/// Helpers for building concrete paths from the route templates above
pub mod utils {
    /// Replace a single path parameter.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }
}
