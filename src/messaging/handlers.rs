use std::sync::Arc;

use async_trait::async_trait;

use super::broker::MessageBroker;
use crate::seedwork::domain::IntegrationEvent;
use crate::seedwork::eventing::IntegrationEventHandler;

/// Forwards `VideoAudioMediaUploadedIntegrationEvent` to the encoder queue.
pub struct PublishVideoMediaReplacedInQueueHandler {
    broker: Arc<dyn MessageBroker>,
}

impl PublishVideoMediaReplacedInQueueHandler {
    pub fn new(broker: Arc<dyn MessageBroker>) -> Self {
        Self { broker }
    }
}

#[async_trait]
impl IntegrationEventHandler for PublishVideoMediaReplacedInQueueHandler {
    async fn handle(&self, event: &IntegrationEvent) -> anyhow::Result<()> {
        self.broker.publish_event(event).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::video::{AudioVideoMedia, MediaKind, Rating, Video, VideoCreateProps, VIDEO_MEDIA_UPLOADED_EVENT};
    use crate::messaging::InMemoryMessageBroker;
    use crate::seedwork::domain::AggregateEvents;
    use crate::seedwork::eventing::DomainEventMediator;

    #[tokio::test]
    async fn test_mediator_forwards_media_uploaded_to_broker() {
        let broker = Arc::new(InMemoryMessageBroker::new());
        let mediator = DomainEventMediator::new();
        mediator
            .register_integration(
                VIDEO_MEDIA_UPLOADED_EVENT,
                Arc::new(PublishVideoMediaReplacedInQueueHandler::new(broker.clone())),
            )
            .await;

        let mut video = Video::create(VideoCreateProps {
            title: "Movie".into(),
            description: String::new(),
            year_launched: 2021,
            duration: 120,
            rating: Rating::Age16,
            is_opened: true,
            categories_id: vec![],
            genres_id: vec![],
        });
        video.replace_media(MediaKind::Video, AudioVideoMedia::new("movie.mp4", "raw"));

        mediator.publish_integration_events(&AggregateEvents(&video)).await.unwrap();

        let published = broker.published().await;
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].payload["file_path"], "raw/movie.mp4");
    }
}
