//! Generated OpenAPI document for the records API.

use utoipa::OpenApi;

use crate::handlers;
use crate::models::{ErrorBody, PhoneRecordRequest, PhoneRecordResponse};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Phone Records API",
        description = "Stores phone records with server-side uniqueness and external number validation."
    ),
    paths(handlers::create_record, handlers::list_records, handlers::get_record),
    components(schemas(PhoneRecordRequest, PhoneRecordResponse, ErrorBody)),
    tags((name = "records", description = "Phone record operations"))
)]
pub struct ApiDoc;
