use serde::Deserialize;

/// SQL query builder for the service catalog listing
/// Builds a single parameterized query with filters, sorting, and pagination
pub struct CatalogQueryBuilder {
    base_query: String,
    where_clauses: Vec<String>,
    params: Vec<String>,
    order_clause: Option<String>,
    limit: u32,
    offset: u32,
}

impl CatalogQueryBuilder {
    pub fn new() -> Self {
        Self {
            base_query: "SELECT service_id, service_name, description, duration_minutes, \
                         price_cents, category, image_url FROM service"
                .to_string(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            order_clause: None,
            limit: 20,
            offset: 0,
        }
    }

    /// Adds a search filter for partial name matching (case-insensitive)
    pub fn add_search_filter(&mut self, search: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("service_name ILIKE ${}", param_index));
        self.params.push(format!("%{}%", search));
    }

    /// Adds a category filter (case-insensitive exact match)
    pub fn add_category_filter(&mut self, category: &str) {
        let param_index = self.params.len() + 1;
        self.where_clauses
            .push(format!("category ILIKE ${}", param_index));
        self.params.push(category.to_string());
    }

    /// Adds inclusive price range filters in cents (min and/or max)
    ///
    /// Bound as text parameters and cast server-side, so the params vec stays
    /// homogeneous for the caller's bind loop.
    pub fn add_price_range(&mut self, min_cents: Option<i64>, max_cents: Option<i64>) {
        if let Some(min) = min_cents {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("price_cents >= ${}::bigint", param_index));
            self.params.push(min.to_string());
        }

        if let Some(max) = max_cents {
            let param_index = self.params.len() + 1;
            self.where_clauses
                .push(format!("price_cents <= ${}::bigint", param_index));
            self.params.push(max.to_string());
        }
    }

    /// Sets the sort order for the query
    pub fn set_sort(&mut self, field: SortField, order: SortOrder) {
        let field_name = match field {
            SortField::Price => "price_cents",
            SortField::Duration => "duration_minutes",
        };

        let order_str = match order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };

        self.order_clause = Some(format!("{} {}", field_name, order_str));
    }

    /// Sets pagination parameters (1-indexed page)
    pub fn set_pagination(&mut self, page: u32, limit: u32) {
        self.limit = limit;
        self.offset = (page - 1) * limit;
    }

    /// Builds the final SQL query string with all parameters
    /// Returns a tuple of (query_string, parameters)
    pub fn build(&self) -> (String, Vec<String>) {
        let mut query = self.base_query.clone();

        if !self.where_clauses.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(ref order) = self.order_clause {
            query.push_str(" ORDER BY ");
            query.push_str(order);
        }

        // LIMIT/OFFSET are integers validated upstream, appended directly
        query.push_str(&format!(" LIMIT {}", self.limit));
        query.push_str(&format!(" OFFSET {}", self.offset));

        (query, self.params.clone())
    }
}

impl Default for CatalogQueryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Query parameters extracted from the catalog listing request
#[derive(Debug, Deserialize)]
pub struct CatalogQueryParams {
    /// Search term for partial service-name matching
    pub search: Option<String>,
    /// Filter by category (case-insensitive exact match)
    pub category: Option<String>,
    /// Minimum price in cents (inclusive)
    pub min_price_cents: Option<i64>,
    /// Maximum price in cents (inclusive)
    pub max_price_cents: Option<i64>,
    /// Sort field: "price" or "duration"
    pub sort: Option<String>,
    /// Sort order: "asc" or "desc"
    pub order: Option<String>,
    /// Page number (1-indexed, defaults to 1)
    pub page: Option<u32>,
    /// Items per page (defaults to 20)
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Price,
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

/// Validated and normalized catalog query parameters
#[derive(Debug)]
pub struct ValidatedCatalogQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub sort_field: Option<SortField>,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

/// Validation error type for catalog queries
#[derive(Debug)]
pub struct QueryValidationError {
    pub message: String,
}

impl std::fmt::Display for QueryValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for QueryValidationError {}

/// Catalog query parameter validator
pub struct CatalogQueryValidator;

impl CatalogQueryValidator {
    /// Validates and normalizes query parameters
    pub fn validate(
        params: CatalogQueryParams,
    ) -> Result<ValidatedCatalogQuery, QueryValidationError> {
        let search = Self::normalize_string(params.search);
        let category = Self::normalize_string(params.category);

        if let Some(min) = params.min_price_cents {
            Self::validate_price(min, "min_price_cents")?;
        }
        if let Some(max) = params.max_price_cents {
            Self::validate_price(max, "max_price_cents")?;
        }
        if let (Some(min), Some(max)) = (params.min_price_cents, params.max_price_cents) {
            if min > max {
                return Err(QueryValidationError {
                    message: "min_price_cents cannot be greater than max_price_cents".to_string(),
                });
            }
        }

        let sort_field = match params.sort {
            Some(sort_str) => Some(Self::parse_sort_field(&sort_str)?),
            None => None,
        };

        let sort_order = match params.order {
            Some(order_str) => Self::parse_sort_order(&order_str)?,
            // Cheapest-first is the natural catalog default
            None => SortOrder::Asc,
        };

        let page = match params.page {
            Some(p) => {
                Self::validate_pagination_param(p, "page")?;
                p
            }
            None => 1,
        };

        let limit = match params.limit {
            Some(l) => {
                Self::validate_pagination_param(l, "limit")?;
                l
            }
            None => 20,
        };

        Ok(ValidatedCatalogQuery {
            search,
            category,
            min_price_cents: params.min_price_cents,
            max_price_cents: params.max_price_cents,
            sort_field,
            sort_order,
            page,
            limit,
        })
    }

    /// Normalizes string parameters: trims, maps empty to None
    fn normalize_string(s: Option<String>) -> Option<String> {
        s.and_then(|s| {
            let trimmed = s.trim().to_string();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed)
            }
        })
    }

    fn validate_price(cents: i64, param_name: &str) -> Result<(), QueryValidationError> {
        if cents < 0 {
            return Err(QueryValidationError {
                message: format!("{} must not be negative", param_name),
            });
        }
        Ok(())
    }

    fn parse_sort_field(s: &str) -> Result<SortField, QueryValidationError> {
        match s.to_lowercase().as_str() {
            "price" => Ok(SortField::Price),
            "duration" => Ok(SortField::Duration),
            _ => Err(QueryValidationError {
                message: format!("Invalid sort field '{}'. Must be 'price' or 'duration'", s),
            }),
        }
    }

    fn parse_sort_order(s: &str) -> Result<SortOrder, QueryValidationError> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(QueryValidationError {
                message: format!("Invalid sort order '{}'. Must be 'asc' or 'desc'", s),
            }),
        }
    }

    fn validate_pagination_param(value: u32, param_name: &str) -> Result<(), QueryValidationError> {
        if value == 0 {
            return Err(QueryValidationError {
                message: format!("{} must be a positive number (greater than 0)", param_name),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic_query() {
        let builder = CatalogQueryBuilder::new();
        let (query, params) = builder.build();

        assert!(query.contains("FROM service"));
        assert!(query.contains("LIMIT 20"));
        assert!(query.contains("OFFSET 0"));
        assert!(params.is_empty());
    }

    #[test]
    fn test_builder_with_search() {
        let mut builder = CatalogQueryBuilder::new();
        builder.add_search_filter("cut");
        let (query, params) = builder.build();

        assert!(query.contains("service_name ILIKE $1"));
        assert_eq!(params[0], "%cut%");
    }

    #[test]
    fn test_builder_with_category() {
        let mut builder = CatalogQueryBuilder::new();
        builder.add_category_filter("Color");
        let (query, params) = builder.build();

        assert!(query.contains("category ILIKE $1"));
        assert_eq!(params[0], "Color");
    }

    #[test]
    fn test_builder_with_price_range() {
        let mut builder = CatalogQueryBuilder::new();
        builder.add_price_range(Some(5000), Some(20000));
        let (query, params) = builder.build();

        assert!(query.contains("price_cents >= $1::bigint"));
        assert!(query.contains("price_cents <= $2::bigint"));
        assert_eq!(params, vec!["5000", "20000"]);
    }

    #[test]
    fn test_builder_param_indices_compose() {
        let mut builder = CatalogQueryBuilder::new();
        builder.add_search_filter("wash");
        builder.add_category_filter("Hair");
        builder.add_price_range(Some(1000), None);
        let (query, params) = builder.build();

        assert!(query.contains("service_name ILIKE $1"));
        assert!(query.contains("category ILIKE $2"));
        assert!(query.contains("price_cents >= $3::bigint"));
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_builder_with_sort_and_pagination() {
        let mut builder = CatalogQueryBuilder::new();
        builder.set_sort(SortField::Price, SortOrder::Desc);
        builder.set_pagination(3, 10);
        let (query, _) = builder.build();

        assert!(query.contains("ORDER BY price_cents DESC"));
        assert!(query.contains("LIMIT 10"));
        assert!(query.contains("OFFSET 20"));
    }

    #[test]
    fn test_validator_defaults() {
        let params = CatalogQueryParams {
            search: None,
            category: None,
            min_price_cents: None,
            max_price_cents: None,
            sort: None,
            order: None,
            page: None,
            limit: None,
        };

        let validated = CatalogQueryValidator::validate(params).unwrap();
        assert_eq!(validated.page, 1);
        assert_eq!(validated.limit, 20);
        assert_eq!(validated.sort_order, SortOrder::Asc);
        assert!(validated.sort_field.is_none());
    }

    #[test]
    fn test_validator_rejects_inverted_price_range() {
        let params = CatalogQueryParams {
            search: None,
            category: None,
            min_price_cents: Some(10000),
            max_price_cents: Some(500),
            sort: None,
            order: None,
            page: None,
            limit: None,
        };

        assert!(CatalogQueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validator_rejects_bad_sort() {
        let params = CatalogQueryParams {
            search: None,
            category: None,
            min_price_cents: None,
            max_price_cents: None,
            sort: Some("rating".to_string()),
            order: None,
            page: None,
            limit: None,
        };

        assert!(CatalogQueryValidator::validate(params).is_err());
    }

    #[test]
    fn test_validator_normalizes_blank_search() {
        let params = CatalogQueryParams {
            search: Some("   ".to_string()),
            category: Some(" Hair ".to_string()),
            min_price_cents: None,
            max_price_cents: None,
            sort: None,
            order: None,
            page: None,
            limit: None,
        };

        let validated = CatalogQueryValidator::validate(params).unwrap();
        assert!(validated.search.is_none());
        assert_eq!(validated.category.as_deref(), Some("Hair"));
    }

    #[test]
    fn test_validator_rejects_zero_page() {
        let params = CatalogQueryParams {
            search: None,
            category: None,
            min_price_cents: None,
            max_price_cents: None,
            sort: None,
            order: None,
            page: Some(0),
            limit: None,
        };

        assert!(CatalogQueryValidator::validate(params).is_err());
    }
}
