use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::{self, Stream};
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};
use crate::api::dtos::responses::AvailabilityResponse;
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_active_gira(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let availability = state.booking_service.availability().await?;
    Ok(Json(availability.into()))
}

/// Server-sent stream of gira changes and booking counts.
pub async fn gira_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let receiver = state.gira_feed.subscribe();
    debug!("gira feed subscriber connected");

    let stream = stream::unfold(receiver, |mut receiver| async move {
        loop {
            match receiver.recv().await {
                Ok(change) => {
                    let event = match Event::default().event(change.event_name()).json_data(&change) {
                        Ok(event) => event,
                        Err(e) => {
                            warn!("Failed to encode gira change: {}", e);
                            continue;
                        }
                    };
                    return Some((Ok(event), receiver));
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "gira feed subscriber lagged");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
