use crate::core::generator::DisabledGenerator;
use crate::core::search::SimulatedSearch;
use crate::core::social::SocialPoster;
use crate::domain::ports::{SearchProvider, Storage, TextGenerator};
use std::sync::Arc;

/// Shared handles every service works with.
#[derive(Clone)]
pub struct ServiceContext {
    pub storage: Arc<dyn Storage>,
    pub generator: Arc<dyn TextGenerator>,
    pub search: Arc<dyn SearchProvider>,
    pub poster: Arc<SocialPoster>,
}

impl ServiceContext {
    pub fn new(
        storage: Arc<dyn Storage>,
        generator: Arc<dyn TextGenerator>,
        search: Arc<dyn SearchProvider>,
        poster: Arc<SocialPoster>,
    ) -> Self {
        Self {
            storage,
            generator,
            search,
            poster,
        }
    }

    /// Offline context: no generator, simulated search, posting disabled.
    pub fn offline(storage: Arc<dyn Storage>) -> Self {
        Self::new(
            storage,
            Arc::new(DisabledGenerator),
            Arc::new(SimulatedSearch),
            Arc::new(SocialPoster::disabled()),
        )
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_poster(mut self, poster: SocialPoster) -> Self {
        self.poster = Arc::new(poster);
        self
    }
}
