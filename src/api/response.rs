use serde::Serialize;

/// 统一响应体: `{"success": bool, "message": string?, "data": T?}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,

    // 如果为 None，序列化时跳过
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(message: &str, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: Some(data),
        }
    }

    pub fn message(message: &str) -> Self {
        Self {
            success: true,
            message: Some(message.to_string()),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_fields_are_skipped() {
        let body = serde_json::to_string(&ApiResponse::success(1)).unwrap();
        assert_eq!(body, r#"{"success":true,"data":1}"#);

        let body = serde_json::to_string(&ApiResponse::<()>::message("ok")).unwrap();
        assert_eq!(body, r#"{"success":true,"message":"ok"}"#);
    }
}
