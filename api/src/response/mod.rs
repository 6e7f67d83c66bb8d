use serde::Serialize;

/// Uniform JSON body returned by every route:
///
/// ```json
/// { "success": true, "data": { ... }, "message": "Lead created" }
/// ```
///
/// Error bodies carry `T::default()` as `data`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T>
where
    T: Serialize,
{
    pub success: bool,
    pub data: T,
    pub message: String,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            data: T::default(),
            message: message.into(),
        }
    }
}

/// Serializes as `{}`; the `data` of responses that have nothing to return.
#[derive(Debug, Serialize, Default)]
pub struct Empty {}
