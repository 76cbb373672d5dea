use serde::{Deserialize, Serialize};

use super::aggregate::Video;
use crate::seedwork::repository::{InMemorySearch, InMemorySearchableRepository, SearchableRepository, SortValue};
use crate::seedwork::search::SearchFilter;

// ============================================================================
// Video Repository
// ============================================================================

pub const VIDEO_SORTABLE_FIELDS: &[&str] = &["title", "created_at"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoFilter {
    #[serde(default)]
    pub title: Option<String>,
}

impl VideoFilter {
    pub fn title(title: impl Into<String>) -> Self {
        Self { title: Some(title.into()) }
    }
}

impl SearchFilter for VideoFilter {
    fn is_empty(&self) -> bool {
        self.title.as_deref().map_or(true, |title| title.trim().is_empty())
    }
}

pub trait VideoRepository: SearchableRepository<Video, VideoFilter> {}

impl<T: SearchableRepository<Video, VideoFilter>> VideoRepository for T {}

pub struct VideoSearch;

impl InMemorySearch<Video, VideoFilter> for VideoSearch {
    fn sortable_fields(&self) -> &'static [&'static str] {
        VIDEO_SORTABLE_FIELDS
    }

    fn matches(&self, video: &Video, filter: &VideoFilter) -> bool {
        match &filter.title {
            Some(title) => video.title.to_lowercase().contains(&title.to_lowercase()),
            None => true,
        }
    }

    fn sort_value(&self, video: &Video, field: &str) -> SortValue {
        match field {
            "title" => SortValue::Text(video.title.clone()),
            "created_at" => SortValue::Timestamp(video.created_at),
            _ => SortValue::Null,
        }
    }
}

pub type VideoInMemoryRepository = InMemorySearchableRepository<Video, VideoFilter, VideoSearch>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{AudioVideoMedia, MediaKind, Rating, VideoCreateProps, VideoId};
    use crate::seedwork::domain::AggregateRoot;
    use crate::seedwork::repository::Repository;
    use crate::seedwork::search::{RawSearchParams, SearchParams};
    use chrono::{Duration, Utc};
    use serde_json::json;

    fn video(title: &str, age_secs: i64) -> Video {
        Video::restore(
            VideoId::new(),
            VideoCreateProps {
                title: title.to_string(),
                description: String::new(),
                year_launched: 2000,
                duration: 100,
                rating: Rating::Free,
                is_opened: false,
                categories_id: vec![],
                genres_id: vec![],
            },
            None,
            None,
            Utc::now() - Duration::seconds(age_secs),
        )
    }

    #[tokio::test]
    async fn test_search_by_title_sorted_by_title() {
        let repo = VideoInMemoryRepository::new(VideoSearch);
        repo.bulk_insert(&[video("b movie", 3), video("A Movie", 2), video("Series", 1)])
            .await
            .unwrap();

        let params = SearchParams::new(
            serde_json::from_value::<RawSearchParams<VideoFilter>>(json!({
                "sort": "title",
                "sort_dir": "asc",
                "filter": {"title": "MOVIE"}
            }))
            .unwrap(),
        );
        let result = repo.search(&params).await.unwrap();

        let titles: Vec<_> = result.items.iter().map(|v| v.title.as_str()).collect();
        assert_eq!(titles, ["A Movie", "b movie"]);
        assert_eq!(result.total, 2);
    }

    #[tokio::test]
    async fn test_stored_copy_drops_events_but_keeps_projection_handlers() {
        let repo = VideoInMemoryRepository::new(VideoSearch);
        let mut original = video("Movie", 0);
        original.replace_media(MediaKind::Trailer, AudioVideoMedia::new("t.mp4", "raw"));
        repo.insert(&original).await.unwrap();

        let mut stored = repo.find_by_id(&original.video_id).await.unwrap().unwrap();
        assert!(stored.events().is_empty());
        assert_eq!(original.events().len(), 1);

        stored.replace_media(MediaKind::Video, AudioVideoMedia::new("v.mp4", "raw"));
        assert!(!stored.is_published);
        assert_eq!(stored.events().len(), 1);
    }
}
