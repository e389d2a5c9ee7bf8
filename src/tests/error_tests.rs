#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use http_body_util::BodyExt;
    use serde_json::Value;

    use crate::error::{validation, AppError, AppResult, OptionExt};
    use crate::hierarchy::{HierarchyError, StoreError};

    async fn body_json(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let error = AppError::BadRequest("Invalid input".to_string());
        assert_eq!(format!("{}", error), "Bad request: Invalid input");

        let error = AppError::ValidationError { field: "name".into(), message: "Value is required".into() };
        assert_eq!(format!("{}", error), "Validation error on field 'name': Value is required");
    }

    #[tokio::test]
    async fn test_error_body_format() {
        let (status, body) = body_json(AppError::Conflict("taken".into())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "CONFLICT");
        assert_eq!(body["error"]["message"], "taken");
        assert_eq!(body["status"], 409);
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_internal_error_hides_cause() {
        let (status, body) = body_json(AppError::Internal(anyhow::anyhow!("secret detail"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.to_string().contains("secret detail"));
        assert!(body["error"]["details"]["error_id"].is_string());
    }

    #[test]
    fn test_hierarchy_error_mapping() {
        let kind = "organization";
        let cases: Vec<(HierarchyError, StatusCode)> = vec![
            (HierarchyError::NotFound { kind, id: 1 }, StatusCode::NOT_FOUND),
            (HierarchyError::DepthExceeded { kind, level: 6, max_depth: 5 }, StatusCode::BAD_REQUEST),
            (HierarchyError::SelfParent { kind, id: 1 }, StatusCode::BAD_REQUEST),
            (HierarchyError::RootReparentForbidden { kind, id: 1 }, StatusCode::CONFLICT),
            (HierarchyError::HasChildrenReparentForbidden { kind, id: 1 }, StatusCode::CONFLICT),
            (HierarchyError::HasChildren { kind, id: 1 }, StatusCode::CONFLICT),
            (
                HierarchyError::PersistFailed { op: "create", kind, id: 0, source: StoreError::Conflict("dup".into()) },
                StatusCode::CONFLICT,
            ),
            (
                HierarchyError::QueryFailed { op: "find_all", kind, id: 0, source: StoreError::Backend("io".into()) },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (HierarchyError::CorruptChain { kind, id: 3 }, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let label = format!("{err:?}");
            assert_eq!(AppError::from(err).into_response().status(), expected, "{label}");
        }
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, AppError::NotFound(_)));

        let err: AppError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[test]
    fn test_option_ext() {
        let some_value: Option<i32> = Some(42);
        let result: AppResult<i32> = some_value.ok_or_not_found("book");
        assert_eq!(result.unwrap(), 42);

        let none_value: Option<i32> = None;
        match none_value.ok_or_not_found("book") {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "book not found"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_helpers() {
        assert!(validation::validate_required("eng", "name", 32).is_ok());
        assert!(validation::validate_required("  ", "name", 32).is_err());
        // characters, not bytes
        assert!(validation::validate_max_len("äöü", "name", 3).is_ok());
        assert!(validation::validate_max_len("äöüß", "name", 3).is_err());

        assert!(validation::validate_positive_number(None, "id").is_ok());
        assert!(validation::validate_positive_number(Some(1), "id").is_ok());
        assert!(validation::validate_positive_number(Some(0), "id").is_err());

        assert!(validation::validate_parent_id(0).is_ok());
        assert!(validation::validate_parent_id(-3).is_err());
    }
}
