use std::sync::Arc;
use tracing::{debug, info, instrument};

use super::models::{Achievement, FIRST_TOP_TITLE, YAKUMAN_TITLE};
use super::repository::AchievementRepository;
use crate::notification::{Notification, NotificationBus, Severity};
use crate::record::models::{GameRecord, HighlightKind};
use crate::shared::AppError;

/// Evaluates unlock conditions whenever a game record is saved. The
/// "first top" check is a query over the full saved history, not a pure
/// function of the new record alone.
pub struct AchievementService {
    achievements: Arc<dyn AchievementRepository>,
    notifications: NotificationBus,
}

impl AchievementService {
    pub fn new(
        achievements: Arc<dyn AchievementRepository>,
        notifications: NotificationBus,
    ) -> Self {
        Self {
            achievements,
            notifications,
        }
    }

    /// Checks the freshly saved record for unlocks. `prior_records` is
    /// the history as it was before this record was added.
    #[instrument(skip(self, record, prior_records))]
    pub async fn evaluate_record(
        &self,
        record: &GameRecord,
        prior_records: &[GameRecord],
    ) -> Result<Vec<Achievement>, AppError> {
        let existing = self.achievements.list().await?;
        let mut unlocked: Vec<Achievement> = Vec::new();

        if let Some(winner) = record.players.iter().find(|p| p.rank == 1) {
            let had_prior_top = prior_records.iter().any(|r| {
                r.players
                    .iter()
                    .any(|p| p.player_id == winner.player_id && p.rank == 1)
            });
            let already_awarded = existing
                .iter()
                .any(|a| a.player_id == winner.player_id && a.title == FIRST_TOP_TITLE);

            if !had_prior_top && !already_awarded {
                unlocked.push(Achievement::first_top(&winner.player_id, record.date));
            }
        }

        for highlight in &record.highlights {
            if highlight.kind != HighlightKind::Yakuman {
                continue;
            }
            let Some(player_id) = &highlight.player_id else {
                continue;
            };

            // One yakuman badge per player per calendar day.
            let day = record.date.date_naive();
            let duplicate = existing
                .iter()
                .chain(unlocked.iter())
                .any(|a| {
                    a.player_id == *player_id
                        && a.title == YAKUMAN_TITLE
                        && a.date.date_naive() == day
                });
            if duplicate {
                debug!(player_id = %player_id, "Yakuman badge already unlocked today");
                continue;
            }

            unlocked.push(Achievement::yakuman(player_id, &highlight.text, record.date));
        }

        for achievement in &unlocked {
            self.achievements.add(achievement.clone()).await?;

            let player_name = record
                .players
                .iter()
                .find(|p| p.player_id == achievement.player_id)
                .map(|p| p.name.clone())
                .unwrap_or_else(|| achievement.player_id.clone());

            info!(
                player_id = %achievement.player_id,
                title = %achievement.title,
                "Achievement unlocked"
            );
            self.notifications.emit(Notification::new(
                "Achievement unlocked",
                format!("{} earned \"{}\"", player_name, achievement.title),
                Severity::Success,
            ));
        }

        Ok(unlocked)
    }
}
