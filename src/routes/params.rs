use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RestaurantQuery {
    /// Case-insensitive substring of the name or description.
    pub search: Option<String>,
    /// Exact cuisine tag, e.g. `Italian`.
    pub cuisine: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MenuQuery {
    pub category: Option<String>,
}
