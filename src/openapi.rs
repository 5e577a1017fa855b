use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::features::health::handler::health_check,
        crate::features::health::handler::get_version,
        crate::features::stats::handler::get_stats,
        crate::features::image::handler::resize_image,
        crate::features::image::handler::image_info,
    ),
    components(
        schemas(
            crate::error::AppError,
            crate::error::ErrorResponse,
            crate::features::health::HealthResponse,
            crate::features::health::VersionResponse,
            crate::features::stats::ServiceStats,
            crate::features::stats::StatsResponse,
            crate::features::image::ImageInfo,
            crate::features::image::types::ResizeForm,
            crate::features::image::types::InfoForm,
        )
    ),
    tags(
        (name = "Image", description = "Image APIs"),
        (name = "Stats", description = "Stats APIs"),
        (name = "Health", description = "Health APIs"),
    ),
    info(
        title = "Image Resizer API",
        description = "Upload an image, resize it or read its metadata (Axum)"
    )
)]
pub struct ApiDoc;
