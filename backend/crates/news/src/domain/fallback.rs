//! Fallback Articles
//!
//! Shown whenever the remote service cannot be reached. Same wire shape as
//! a live response, so the pages decorate them the same way.

use crate::domain::article::{RawArticle, RawSource};

const FALLBACK_SOURCE: &str = "NewsHub";

struct Sample {
    title: &'static str,
    author: &'static str,
    published_at: &'static str,
    slug: &'static str,
    image: &'static str,
    description: &'static str,
}

const SAMPLES: [Sample; 4] = [
    Sample {
        title: "Breaking: Major Tech Conference Announces Revolutionary AI Breakthrough",
        author: "Sarah Johnson",
        published_at: "2024-01-15T09:00:00Z",
        slug: "tech-conference-ai-breakthrough",
        image: "https://images.unsplash.com/photo-1485827404703-89b55fcc595e?w=400&h=250&fit=crop",
        description: "Industry leaders gather to discuss the latest developments in artificial intelligence technology that could reshape the future of computing.",
    },
    Sample {
        title: "Climate Change Impact: New Research Reveals Alarming Ocean Temperature Rise",
        author: "Dr. Michael Chen",
        published_at: "2024-01-14T09:00:00Z",
        slug: "ocean-temperature-rise",
        image: "https://images.pexels.com/photos/1001682/pexels-photo-1001682.jpeg?w=400&h=250&fit=crop",
        description: "Scientists from leading universities present compelling evidence of accelerated ocean warming patterns affecting marine ecosystems worldwide.",
    },
    Sample {
        title: "The Future of Remote Work: How Companies Are Adapting to Hybrid Models",
        author: "Emily Rodriguez",
        published_at: "2024-01-13T09:00:00Z",
        slug: "future-of-remote-work",
        image: "https://images.pixabay.com/photo/2020/07/08/04/12/work-5382501_1280.jpg?w=400&h=250&fit=crop",
        description: "An in-depth analysis of how organizations worldwide are implementing flexible work arrangements and the long-term implications for productivity.",
    },
    Sample {
        title: "Sustainable Energy Solutions: Solar Power Efficiency Reaches New Heights",
        author: "James Wilson",
        published_at: "2024-01-12T09:00:00Z",
        slug: "solar-power-efficiency",
        image: "https://images.unsplash.com/photo-1509391366360-2e959784a276?w=400&h=250&fit=crop",
        description: "Latest innovations in photovoltaic technology promise to make solar energy more accessible and cost-effective for residential consumers.",
    },
];

/// The built-in sample articles
pub fn sample_articles() -> Vec<RawArticle> {
    SAMPLES
        .iter()
        .map(|sample| RawArticle {
            source: Some(RawSource {
                id: None,
                name: Some(FALLBACK_SOURCE.to_string()),
            }),
            author: Some(sample.author.to_string()),
            title: Some(sample.title.to_string()),
            description: Some(sample.description.to_string()),
            url: Some(format!("https://newshub.example/articles/{}", sample.slug)),
            url_to_image: Some(sample.image.to_string()),
            published_at: Some(sample.published_at.to_string()),
            content: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_are_complete() {
        let samples = sample_articles();
        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|a| a.author.is_some() && a.title.is_some()));
        assert_eq!(samples[1].author.as_deref(), Some("Dr. Michael Chen"));
    }
}
