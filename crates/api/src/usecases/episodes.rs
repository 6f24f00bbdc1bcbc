//! Episodes of series.

use async_trait::async_trait;
use flixhub_core::catalog::ContentType;
use flixhub_core::types::DbId;
use flixhub_core::validation::{validate_not_blank, FieldErrors};
use flixhub_db::models::episode::{CreateEpisode, Episode, UpdateEpisode};
use flixhub_db::repositories::{ContentRepo, EpisodeRepo};
use serde::Deserialize;
use validator::Validate;

use super::not_found;
use crate::error::AppResult;
use crate::mediator::Request;
use crate::state::AppState;

fn slot_taken_message(season: i32, episode: i32) -> String {
    format!("Season {season} already has an episode {episode}")
}

#[derive(Debug, Validate)]
pub struct GetEpisodeRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for GetEpisodeRequest {
    type Response = Episode;

    async fn handle(self, state: &AppState) -> AppResult<Episode> {
        EpisodeRepo::find_by_id(&state.pool, self.id)
            .await?
            .ok_or_else(|| not_found("Episode", self.id))
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateEpisodeRequest {
    pub content_id: DbId,
    #[validate(range(min = 1))]
    pub season_number: i32,
    #[validate(range(min = 1))]
    pub episode_number: i32,
    #[validate(custom(function = "validate_not_blank"), length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
}

#[async_trait]
impl Request for CreateEpisodeRequest {
    type Response = Episode;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        let Some(content) = ContentRepo::find_by_id(&state.pool, self.content_id).await? else {
            errors.add("content_id", "Content does not exist");
            return Ok(errors);
        };
        if content.content_type != ContentType::Series.as_str() {
            errors.add("content_id", "Episodes can only be added to a series");
            return Ok(errors);
        }
        if EpisodeRepo::slot_taken(
            &state.pool,
            self.content_id,
            self.season_number,
            self.episode_number,
            None,
        )
        .await?
        {
            errors.add(
                "episode_number",
                slot_taken_message(self.season_number, self.episode_number),
            );
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Episode> {
        let input = CreateEpisode {
            content_id: self.content_id,
            season_number: self.season_number,
            episode_number: self.episode_number,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            video_url: self.video_url,
            thumbnail_url: self.thumbnail_url,
        };
        let episode = EpisodeRepo::create(&state.pool, &input).await?;
        tracing::info!(
            episode_id = episode.id,
            content_id = episode.content_id,
            season = episode.season_number,
            episode = episode.episode_number,
            "Episode created"
        );
        Ok(episode)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEpisodeRequest {
    #[serde(skip)]
    pub id: DbId,
    #[validate(range(min = 1))]
    pub season_number: Option<i32>,
    #[validate(range(min = 1))]
    pub episode_number: Option<i32>,
    #[validate(custom(function = "validate_not_blank"), length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    #[validate(url)]
    pub video_url: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
}

#[async_trait]
impl Request for UpdateEpisodeRequest {
    type Response = Episode;

    async fn validate_with_store(&self, state: &AppState) -> AppResult<FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.season_number.is_none() && self.episode_number.is_none() {
            return Ok(errors);
        }
        // A missing episode is reported as 404 by the handler.
        let Some(current) = EpisodeRepo::find_by_id(&state.pool, self.id).await? else {
            return Ok(errors);
        };

        let season = self.season_number.unwrap_or(current.season_number);
        let episode = self.episode_number.unwrap_or(current.episode_number);
        if EpisodeRepo::slot_taken(&state.pool, current.content_id, season, episode, Some(self.id))
            .await?
        {
            errors.add("episode_number", slot_taken_message(season, episode));
        }
        Ok(errors)
    }

    async fn handle(self, state: &AppState) -> AppResult<Episode> {
        let input = UpdateEpisode {
            season_number: self.season_number,
            episode_number: self.episode_number,
            title: self.title,
            description: self.description,
            duration_minutes: self.duration_minutes,
            video_url: self.video_url,
            thumbnail_url: self.thumbnail_url,
        };
        EpisodeRepo::update(&state.pool, self.id, &input)
            .await?
            .ok_or_else(|| not_found("Episode", self.id))
    }
}

#[derive(Debug, Validate)]
pub struct DeleteEpisodeRequest {
    pub id: DbId,
}

#[async_trait]
impl Request for DeleteEpisodeRequest {
    type Response = ();

    async fn handle(self, state: &AppState) -> AppResult<()> {
        if !EpisodeRepo::delete(&state.pool, self.id).await? {
            return Err(not_found("Episode", self.id));
        }
        tracing::info!(episode_id = self.id, "Episode deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_start_at_one() {
        let request = CreateEpisodeRequest {
            content_id: 1,
            season_number: 0,
            episode_number: 0,
            title: "Pilot".into(),
            description: None,
            duration_minutes: None,
            video_url: None,
            thumbnail_url: Some("ftp//broken".into()),
        };
        let errors = request.validate_fields().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["episode_number", "season_number", "thumbnail_url"]
        );
    }

    #[test]
    fn slot_message_names_both_numbers() {
        assert_eq!(slot_taken_message(2, 5), "Season 2 already has an episode 5");
    }
}
