use crate::catalog::{Catalog, CatalogError};
use crate::config::{validate, Config, ConfigError};
use crate::contract::{
    CalculatorDto, CategoryDto, CoreRequest, CoreResponse, FavoriteResponse, KeyResponse,
    SearchResponse, SearchResultDto,
};
use crate::controller::{default_bindings, Action, DocumentListeners, InteractionController, KeyEvent};
use crate::model::{Calculator, Category};
use crate::overlay_state::SearchOverlay;
use crate::personalization::PersonalizationStore;
use crate::search::{SearchIndex, SearchResult};
use crate::storage::{MemoryStore, StorageBackend};
use crate::theme::{RootAttributes, Theme, ThemeState};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("calculator not found: {0}")]
    ItemNotFound(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Discovery and personalization state for one UI session.
pub struct CoreService {
    config: Config,
    catalog: Catalog,
    index: SearchIndex,
    personalization: PersonalizationStore<StorageBackend>,
    theme: ThemeState<StorageBackend, RootAttributes>,
    controller: InteractionController<DocumentListeners>,
}

impl CoreService {
    pub fn new(config: Config) -> Result<Self, ServiceError> {
        validate(&config)?;
        let catalog = match &config.catalog_path {
            Some(path) => Catalog::load_file(path)?,
            None => Catalog::builtin(),
        };
        let store = match StorageBackend::open(config.storage, &config.data_dir) {
            Ok(store) => store,
            Err(error) => {
                tracing::warn!(
                    %error,
                    storage = ?config.storage,
                    data_dir = %config.data_dir.display(),
                    "storage unavailable; personalization kept in memory for this session"
                );
                StorageBackend::Memory(MemoryStore::new())
            }
        };
        Self::with_store(config, catalog, store)
    }

    pub fn with_store(
        config: Config,
        catalog: Catalog,
        store: StorageBackend,
    ) -> Result<Self, ServiceError> {
        validate(&config)?;
        let bindings = default_bindings(config.search_combo()?, config.theme_combo()?);
        let index = SearchIndex::build(&catalog, config.search_options());
        let personalization = PersonalizationStore::load(store.clone());
        let theme = ThemeState::load(store, RootAttributes::default());

        tracing::info!(
            calculators = catalog.len(),
            storage = ?config.storage,
            theme = %theme.current(),
            "discovery service ready"
        );

        Ok(Self {
            config,
            catalog,
            index,
            personalization,
            theme,
            controller: InteractionController::new(bindings, DocumentListeners::default()),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn categories(&self) -> &[Category] {
        self.catalog.list_categories()
    }

    /// Swaps in a new catalog snapshot and rebuilds the search index for it.
    pub fn replace_catalog(&mut self, catalog: Catalog) -> usize {
        self.index = SearchIndex::build(&catalog, self.config.search_options());
        self.catalog = catalog;
        self.index.len()
    }

    pub fn search(&self, query: &str) -> Vec<SearchResult> {
        self.index.search(query)
    }

    /// Records the overlay's query and returns the results for it.
    pub fn set_query(&mut self, query: &str) -> Vec<SearchResult> {
        self.controller.overlay_mut().set_query(query);
        self.index.search(query)
    }

    pub fn overlay(&self) -> &SearchOverlay {
        self.controller.overlay()
    }

    pub fn close_search(&mut self) -> bool {
        self.controller.overlay_mut().close()
    }

    /// Resolves a calculator for display and records it as recently used.
    /// Selecting a calculator closes the search overlay.
    pub fn open_calculator(&mut self, id: &str) -> Result<Calculator, ServiceError> {
        let calculator = self
            .catalog
            .find(id)
            .cloned()
            .ok_or_else(|| ServiceError::ItemNotFound(id.to_string()))?;
        self.personalization.add_to_recent(&calculator.id);
        self.controller.overlay_mut().close();
        Ok(calculator)
    }

    /// Unknown ids can only be toggled off, so stale favorites stay removable.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, ServiceError> {
        if self.catalog.find(id).is_none() && !self.personalization.is_favorite(id) {
            return Err(ServiceError::ItemNotFound(id.to_string()));
        }
        Ok(self.personalization.toggle_favorite(id))
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.personalization.is_favorite(id)
    }

    /// Favorites in catalog order.
    pub fn favorite_calculators(&self) -> Vec<&Calculator> {
        self.catalog
            .list_all_calculators()
            .into_iter()
            .filter(|calculator| self.personalization.is_favorite(&calculator.id))
            .collect()
    }

    /// Recently opened calculators, most recent first.
    pub fn recent_calculators(&self) -> Vec<&Calculator> {
        self.catalog
            .resolve_ids(self.personalization.recent().iter().map(String::as_str))
    }

    pub fn clear_recent(&mut self) {
        self.personalization.clear_recent();
    }

    pub fn personalization(&self) -> &PersonalizationStore<StorageBackend> {
        &self.personalization
    }

    pub fn theme(&self) -> Theme {
        self.theme.current()
    }

    pub fn theme_attributes(&self) -> &RootAttributes {
        self.theme.display()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme.set_theme(theme);
    }

    pub fn cycle_theme(&mut self) -> Theme {
        self.theme.cycle_theme()
    }

    pub fn mount(&mut self) -> bool {
        self.controller.mount()
    }

    pub fn unmount(&mut self) -> bool {
        self.controller.unmount()
    }

    pub fn controller(&self) -> &InteractionController<DocumentListeners> {
        &self.controller
    }

    pub fn handle_key(&mut self, event: &KeyEvent) -> Option<Action> {
        self.controller.handle_key(event, &mut self.theme)
    }

    pub fn handle_command(&mut self, request: CoreRequest) -> Result<CoreResponse, ServiceError> {
        match request {
            CoreRequest::Search(request) => {
                let results = self.search(&request.query);
                Ok(self.search_response(request.query, results))
            }
            CoreRequest::SetQuery(request) => {
                let results = self.set_query(&request.query);
                Ok(self.search_response(request.query, results))
            }
            CoreRequest::ListCategories => Ok(CoreResponse::Categories(
                self.categories()
                    .iter()
                    .map(|category| CategoryDto::from_category(category, |id| self.is_favorite(id)))
                    .collect(),
            )),
            CoreRequest::OpenCalculator(request) => {
                let calculator = self.open_calculator(&request.id)?;
                let favorite = self.is_favorite(&calculator.id);
                Ok(CoreResponse::Calculator(CalculatorDto::from_calculator(
                    &calculator,
                    favorite,
                )))
            }
            CoreRequest::ToggleFavorite(request) => {
                let favorite = self.toggle_favorite(&request.id)?;
                Ok(CoreResponse::Favorite(FavoriteResponse {
                    id: request.id,
                    favorite,
                }))
            }
            CoreRequest::Favorites => Ok(CoreResponse::Calculators(
                self.favorite_calculators()
                    .into_iter()
                    .map(|calculator| CalculatorDto::from_calculator(calculator, true))
                    .collect(),
            )),
            CoreRequest::Recent => Ok(CoreResponse::Calculators(
                self.recent_calculators()
                    .into_iter()
                    .map(|calculator| {
                        CalculatorDto::from_calculator(calculator, self.is_favorite(&calculator.id))
                    })
                    .collect(),
            )),
            CoreRequest::ClearRecent => {
                self.clear_recent();
                Ok(CoreResponse::Ack(true))
            }
            CoreRequest::SetTheme(request) => {
                let theme = Theme::parse(&request.theme).ok_or_else(|| {
                    ServiceError::InvalidRequest(format!("unknown theme: {}", request.theme))
                })?;
                self.set_theme(theme);
                Ok(CoreResponse::Theme(theme))
            }
            CoreRequest::CycleTheme => Ok(CoreResponse::Theme(self.cycle_theme())),
            CoreRequest::Key(event) => {
                let action = self.handle_key(&event);
                Ok(CoreResponse::Key(KeyResponse {
                    action,
                    overlay_open: self.overlay().is_open(),
                    theme: self.theme(),
                }))
            }
            CoreRequest::Mount => Ok(CoreResponse::Ack(self.mount())),
            CoreRequest::Unmount => Ok(CoreResponse::Ack(self.unmount())),
        }
    }

    fn search_response(&self, query: String, results: Vec<SearchResult>) -> CoreResponse {
        let results = results
            .into_iter()
            .map(|result| {
                let favorite = self.is_favorite(&result.calculator.id);
                SearchResultDto::from_result(result, favorite)
            })
            .collect();
        CoreResponse::Search(SearchResponse { query, results })
    }
}
