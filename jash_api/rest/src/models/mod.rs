use serde::Serialize;

pub mod contact;

#[derive(Serialize)]
pub struct ApiError<D> {
    pub detail: D,
}

#[derive(Serialize)]
pub struct OkResponse<D = ()> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<D>,
}

impl OkResponse {
    pub fn plain() -> Self {
        Self {
            ok: true,
            detail: None,
        }
    }
}

impl<D> OkResponse<D> {
    pub fn with_detail(detail: D) -> Self {
        Self {
            ok: true,
            detail: Some(detail),
        }
    }
}
