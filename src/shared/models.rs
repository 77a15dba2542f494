use serde::Deserialize;

/// Pagination parameters shared by the paginated list endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(100).clamp(1, 1000)
    }
}

pub mod schema {
    diesel::table! {
        members (id) {
            id -> Uuid,
            name -> Text,
            role -> Text,
            email -> Text,
            contact -> Text,
            password_hash -> Text,
        }
    }

    diesel::table! {
        clients (id) {
            id -> Uuid,
            name -> Text,
            client_code -> Text,
            address -> Nullable<Text>,
            poc -> Nullable<Text>,
            phone -> Nullable<Text>,
            email -> Nullable<Text>,
        }
    }

    diesel::table! {
        vendors (id) {
            id -> Uuid,
            name -> Text,
            vendor_code -> Text,
            address -> Nullable<Text>,
            poc -> Nullable<Text>,
            phone -> Nullable<Text>,
            email -> Nullable<Text>,
            raw_materials -> Nullable<Text>,
        }
    }

    diesel::table! {
        projects (id) {
            id -> Uuid,
            name -> Text,
            quotation_no -> Text,
            status -> Text,
            poc_phone -> Nullable<Text>,
        }
    }

    diesel::table! {
        estimations (id) {
            id -> Text,
            client_name -> Text,
            billing_address -> Nullable<Text>,
            ship_to_address -> Nullable<Text>,
            poc_name -> Nullable<Text>,
            poc_phone -> Nullable<Text>,
            poc_email -> Nullable<Text>,
            prepared_by -> Nullable<Text>,
            project_name -> Text,
            revision -> Nullable<Text>,
            proposal_no -> Nullable<Text>,
            proposal_date -> Nullable<Date>,
            valid_till -> Nullable<Date>,
        }
    }

    diesel::table! {
        company (id) {
            id -> Uuid,
            name -> Text,
            address -> Nullable<Text>,
            email -> Nullable<Text>,
            phone -> Nullable<Text>,
        }
    }
}

pub use schema::*;

#[cfg(test)]
mod tests {
    use super::ListQuery;

    #[test]
    fn test_list_query_defaults() {
        let q = ListQuery::default();
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 100);
    }

    #[test]
    fn test_list_query_clamps_bad_values() {
        let q = ListQuery {
            offset: Some(-5),
            limit: Some(0),
        };
        assert_eq!(q.offset(), 0);
        assert_eq!(q.limit(), 1);

        let q = ListQuery {
            offset: Some(20),
            limit: Some(100_000),
        };
        assert_eq!(q.offset(), 20);
        assert_eq!(q.limit(), 1000);
    }
}
