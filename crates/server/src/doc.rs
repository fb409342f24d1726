use utoipa::OpenApi;

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Health", description = "Service status"),
        (name = "Interests", description = "Student interests and their recommendations"),
        (name = "Catalog", description = "Catalog statistics and reloading"),
    ),
    info(
        title = "Course Recommendation API",
        version = "1.0.0",
        description = "Recommends course offerings for recorded student interests",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;
