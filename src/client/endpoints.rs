//! Endpoint table
//!
//! Every call the client makes, with the cache tags it provides or
//! invalidates.

/// Cache tag attached to query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    DashboardMetrics,
    Products,
    Customers,
    Sales,
    Purchases,
    Expenses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A single API operation
#[derive(Debug, Clone, Copy)]
pub struct Endpoint {
    pub name: &'static str,
    pub method: HttpMethod,
    /// Path template; `{param}` segments are filled in order
    pub path: &'static str,
    pub provides: &'static [Tag],
    pub invalidates: &'static [Tag],
}

impl Endpoint {
    const fn query(name: &'static str, path: &'static str, provides: &'static [Tag]) -> Self {
        Self {
            name,
            method: HttpMethod::Get,
            path,
            provides,
            invalidates: &[],
        }
    }

    const fn mutation(
        name: &'static str,
        method: HttpMethod,
        path: &'static str,
        invalidates: &'static [Tag],
    ) -> Self {
        Self {
            name,
            method,
            path,
            provides: &[],
            invalidates,
        }
    }

    pub fn is_query(&self) -> bool {
        self.method == HttpMethod::Get
    }

    /// Fill the path template with `params`, percent-encoding each one.
    ///
    /// Placeholders without a matching param are left empty.
    pub fn path(&self, params: &[&str]) -> String {
        let mut params = params.iter().copied();
        let segments: Vec<&str> = self
            .path
            .trim_start_matches('/')
            .split('/')
            .map(|segment| {
                if segment.starts_with('{') && segment.ends_with('}') {
                    params.next().unwrap_or_default()
                } else {
                    segment
                }
            })
            .collect();

        let mut url = match reqwest::Url::parse("http://localhost/") {
            Ok(url) => url,
            Err(_) => return format!("/{}", segments.join("/")),
        };
        if let Ok(mut path) = url.path_segments_mut() {
            path.clear().extend(&segments);
        }
        url.path().to_string()
    }
}

pub const GET_DASHBOARD_METRICS: Endpoint =
    Endpoint::query("getDashboardMetrics", "/dashboard", &[Tag::DashboardMetrics]);

pub const GET_PRODUCTS: Endpoint = Endpoint::query("getProducts", "/products", &[Tag::Products]);

pub const CREATE_PRODUCT: Endpoint = Endpoint::mutation(
    "createProduct",
    HttpMethod::Post,
    "/products",
    &[Tag::Products],
);

pub const DELETE_PRODUCT: Endpoint = Endpoint::mutation(
    "deleteProduct",
    HttpMethod::Delete,
    "/products/{productId}",
    &[Tag::Products],
);

pub const UPDATE_PRODUCT: Endpoint = Endpoint::mutation(
    "updateProduct",
    HttpMethod::Put,
    "/products/{productId}",
    &[Tag::Products],
);

pub const UPDATE_PRODUCT_STOCK: Endpoint = Endpoint::mutation(
    "updateProductStock",
    HttpMethod::Post,
    "/products/{productId}/stock",
    &[Tag::Products],
);

pub const DELETE_PRODUCT_STOCK: Endpoint = Endpoint::mutation(
    "deleteProductStock",
    HttpMethod::Delete,
    "/products/{productId}/stock/{stockId}",
    &[Tag::Products],
);

pub const GET_CUSTOMERS: Endpoint =
    Endpoint::query("getCustomers", "/customers", &[Tag::Customers]);

pub const GET_CUSTOMER: Endpoint =
    Endpoint::query("getCustomer", "/customers/{userId}", &[Tag::Customers]);

pub const CREATE_CUSTOMER: Endpoint = Endpoint::mutation(
    "createCustomer",
    HttpMethod::Post,
    "/customers",
    &[Tag::Customers],
);

pub const DELETE_CUSTOMER: Endpoint = Endpoint::mutation(
    "deleteCustomer",
    HttpMethod::Delete,
    "/customers/{userId}",
    &[Tag::Customers],
);

pub const UPDATE_CUSTOMER: Endpoint = Endpoint::mutation(
    "updateCustomer",
    HttpMethod::Put,
    "/customers/{userId}",
    &[Tag::Customers],
);

pub const NEW_SALE: Endpoint = Endpoint::mutation(
    "newSale",
    HttpMethod::Post,
    "/sales",
    &[Tag::Sales, Tag::DashboardMetrics],
);

pub const GET_SALES: Endpoint = Endpoint::query("getSales", "/sales", &[Tag::Sales]);

pub const GET_PURCHASES: Endpoint =
    Endpoint::query("getPurchases", "/purchases", &[Tag::Purchases]);

pub const NEW_PURCHASE: Endpoint = Endpoint::mutation(
    "newPurchase",
    HttpMethod::Post,
    "/purchases",
    &[Tag::Purchases, Tag::DashboardMetrics],
);

pub const GET_EXPENSES: Endpoint = Endpoint::query("getExpenses", "/expenses", &[Tag::Expenses]);

pub const NEW_EXPENSE: Endpoint = Endpoint::mutation(
    "newExpense",
    HttpMethod::Post,
    "/expenses",
    &[Tag::Expenses, Tag::DashboardMetrics],
);

/// Every endpoint, in declaration order
pub const ALL: &[Endpoint] = &[
    GET_DASHBOARD_METRICS,
    GET_PRODUCTS,
    CREATE_PRODUCT,
    DELETE_PRODUCT,
    UPDATE_PRODUCT,
    UPDATE_PRODUCT_STOCK,
    DELETE_PRODUCT_STOCK,
    GET_CUSTOMERS,
    GET_CUSTOMER,
    CREATE_CUSTOMER,
    DELETE_CUSTOMER,
    UPDATE_CUSTOMER,
    NEW_SALE,
    GET_SALES,
    GET_PURCHASES,
    NEW_PURCHASE,
    GET_EXPENSES,
    NEW_EXPENSE,
];
