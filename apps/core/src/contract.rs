use serde::{Deserialize, Serialize};

use crate::controller::{Action, KeyEvent};
use crate::model::{Calculator, Category};
use crate::search::{MatchRange, SearchResult};
use crate::theme::Theme;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueryRequest {
    pub query: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IdRequest {
    pub id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ThemeRequest {
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CalculatorDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub keywords: Vec<String>,
    pub category_id: String,
    pub category_title: String,
    pub favorite: bool,
}

impl CalculatorDto {
    pub fn from_calculator(calculator: &Calculator, favorite: bool) -> Self {
        Self {
            id: calculator.id.clone(),
            title: calculator.title.clone(),
            description: calculator.description.clone(),
            keywords: calculator.keywords.clone(),
            category_id: calculator.category_id.clone(),
            category_title: calculator.category_title.clone(),
            favorite,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub color_token: String,
    pub icon_ref: String,
    pub calculators: Vec<CalculatorDto>,
}

impl CategoryDto {
    pub fn from_category(category: &Category, is_favorite: impl Fn(&str) -> bool) -> Self {
        Self {
            id: category.id.clone(),
            title: category.title.clone(),
            description: category.description.clone(),
            color_token: category.color_token.clone(),
            icon_ref: category.icon_ref.clone(),
            calculators: category
                .calculators()
                .iter()
                .map(|calculator| CalculatorDto::from_calculator(calculator, is_favorite(&calculator.id)))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResultDto {
    pub calculator: CalculatorDto,
    pub score: f64,
    pub matched_ranges: Vec<MatchRange>,
}

impl SearchResultDto {
    pub fn from_result(result: SearchResult, favorite: bool) -> Self {
        Self {
            calculator: CalculatorDto::from_calculator(&result.calculator, favorite),
            score: result.score,
            matched_ranges: result.matched_ranges,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<SearchResultDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FavoriteResponse {
    pub id: String,
    pub favorite: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeyResponse {
    pub action: Option<Action>,
    pub overlay_open: bool,
    pub theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreRequest {
    Search(QueryRequest),
    SetQuery(QueryRequest),
    ListCategories,
    OpenCalculator(IdRequest),
    ToggleFavorite(IdRequest),
    Favorites,
    Recent,
    ClearRecent,
    SetTheme(ThemeRequest),
    CycleTheme,
    Key(KeyEvent),
    Mount,
    Unmount,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum CoreResponse {
    Search(SearchResponse),
    Categories(Vec<CategoryDto>),
    Calculator(CalculatorDto),
    Calculators(Vec<CalculatorDto>),
    Favorite(FavoriteResponse),
    Theme(Theme),
    Key(KeyResponse),
    Ack(bool),
}
