use crate::domain::model::SearchResult;
use crate::domain::ports::SearchProvider;
use rand::seq::SliceRandom;
use rand::Rng;

/// Queries used when a request does not name one.
pub const BROAD_QUERIES: [&str; 5] = [
    "AI in Healthcare challenges",
    "Sustainable Technology trends",
    "Future of Work predictions",
    "Personal Finance automation questions",
    "Digital Marketing ROI challenges",
];

pub fn pick_broad_query<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    BROAD_QUERIES.choose(rng).copied().unwrap_or(BROAD_QUERIES[0])
}

type Topic = (&'static str, [(&'static str, &'static str, &'static str); 3]);

const TOPICS: [Topic; 5] = [
    (
        "AI in Healthcare challenges",
        [
            ("How is AI transforming patient diagnostics?", "AI algorithms are improving accuracy in medical imaging analysis.", "https://example.com/ai-diagnostics"),
            ("What are the ethical implications of AI in medicine?", "Concerns about bias and accountability in AI healthcare decisions.", "https://example.com/ai-ethics"),
            ("Can AI personalize treatment plans?", "AI analyzes patient data to suggest tailored therapies.", "https://example.com/ai-personalization"),
        ],
    ),
    (
        "Sustainable Technology trends",
        [
            ("What is the role of AI in renewable energy optimization?", "AI predicts energy demand and optimizes grid management.", "https://example.com/renewable-ai"),
            ("How can blockchain support supply chain sustainability?", "Blockchain provides transparency and traceability for ethical sourcing.", "https://example.com/blockchain-sustainability"),
            ("Emerging green technologies for smart cities", "Innovations in waste management and energy-efficient infrastructure.", "https://example.com/green-cities"),
        ],
    ),
    (
        "Future of Work predictions",
        [
            ("How will AI impact job displacement and creation?", "Automation may replace some jobs but create new roles requiring different skills.", "https://example.com/ai-jobs"),
            ("What are the best strategies for upskilling in the AI era?", "Lifelong learning and adaptability are key for future workforce.", "https://example.com/upskilling-ai"),
            ("The rise of the gig economy and AI's influence", "AI platforms are connecting freelancers with opportunities globally.", "https://example.com/gig-economy-ai"),
        ],
    ),
    (
        "Personal Finance automation",
        [
            ("How can AI optimize personal investment strategies?", "AI-driven robo-advisors analyze market trends for personalized investment recommendations.", "https://example.com/ai-investing"),
            ("What are the best AI tools for budget management?", "Smart algorithms categorize expenses and predict future spending patterns.", "https://example.com/budget-ai"),
            ("AI-powered fraud detection for personal banking", "Machine learning models identify unusual transaction patterns to prevent fraud.", "https://example.com/ai-fraud-prevention"),
        ],
    ),
    (
        "Digital Marketing ROI",
        [
            ("How to measure AI's impact on marketing campaigns?", "Advanced analytics track customer journey and attribute conversions more accurately.", "https://example.com/ai-marketing-analytics"),
            ("Which AI tools provide the best ROI for small business marketing?", "Cost-effective AI solutions for content creation and audience targeting.", "https://example.com/small-business-ai"),
            ("Predictive analytics for marketing budget optimization", "AI forecasts campaign performance to allocate resources more efficiently.", "https://example.com/predictive-marketing"),
        ],
    ),
];

/// Canned search backend. A query naming one of the known topics returns that
/// topic; anything else gets a random topic.
#[derive(Debug, Clone, Default)]
pub struct SimulatedSearch;

impl SimulatedSearch {
    pub fn topics() -> impl Iterator<Item = &'static str> {
        TOPICS.iter().map(|(name, _)| *name)
    }

    fn matching_topic(query: &str) -> Option<&'static Topic> {
        let query = query.to_lowercase();
        TOPICS
            .iter()
            .find(|(name, _)| query.contains(&name.to_lowercase()))
    }

    pub fn search_with<R: Rng + ?Sized>(
        &self,
        query: &str,
        num_results: usize,
        rng: &mut R,
    ) -> Vec<SearchResult> {
        tracing::info!("Performing web search for: '{}'", query);

        let topic = match Self::matching_topic(query) {
            Some(topic) => topic,
            None => match TOPICS.choose(rng) {
                Some(topic) => topic,
                None => return Vec::new(),
            },
        };
        tracing::info!("Selected broad topic: {}", topic.0);

        topic
            .1
            .iter()
            .take(num_results)
            .map(|(title, snippet, link)| SearchResult {
                title: title.to_string(),
                snippet: snippet.to_string(),
                link: link.to_string(),
            })
            .collect()
    }
}

impl SearchProvider for SimulatedSearch {
    fn search(&self, query: &str, num_results: usize) -> Vec<SearchResult> {
        self.search_with(query, num_results, &mut rand::thread_rng())
    }
}
