use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::time::{interval, Duration};

use crate::clock::ClockRef;
use crate::error::{Result, RoomForgeError};
use crate::model::{EntityFactory, Group, GroupRef, GroupState, GroupType};
use crate::queue::{Queue, QueueConfig};
use crate::sink::RoomSink;

pub const NORMAL_QUEUE: &str = "NormalQueue";
pub const TEAM_QUEUE: &str = "TeamQueue";

const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Two-lane tick driver.
///
/// Full five-player parties match among themselves in the team-exclusive
/// lane until their type-specific patience runs out, then drop into the
/// normal lane with everyone else. Both lanes share one room sink.
pub struct Matcher {
    normal: Arc<Queue>,
    team: Arc<Queue>,
    config: QueueConfig,
    clock: ClockRef,
    running: AtomicBool,
}

impl Matcher {
    pub fn new(
        sink: RoomSink,
        config: QueueConfig,
        factory: Arc<dyn EntityFactory>,
        clock: ClockRef,
    ) -> Result<Self> {
        config.validate()?;
        let normal = Arc::new(Queue::new(
            NORMAL_QUEUE,
            config.clone(),
            sink.clone(),
            factory.clone(),
            clock.clone(),
        )?);
        let team = Arc::new(Queue::new(
            TEAM_QUEUE,
            config.clone(),
            sink,
            factory,
            clock.clone(),
        )?);
        Ok(Self {
            normal,
            team,
            config,
            clock,
            running: AtomicBool::new(false),
        })
    }

    pub fn normal_queue(&self) -> &Queue {
        &self.normal
    }

    pub fn team_queue(&self) -> &Queue {
        &self.team
    }

    /// Classify and route groups: full parties to the team-exclusive lane,
    /// everything else to the normal lane. Sets each group to Queuing.
    pub fn add_groups(&self, groups: Vec<GroupRef>) {
        for group in groups {
            let group_type = group.group_type();
            group.set_state(GroupState::Queuing);
            if group_type == GroupType::NotTeam {
                self.normal.add_groups(vec![group]);
            } else {
                self.team.add_groups(vec![group]);
            }
        }
    }

    /// Drive the 1 Hz tick loop. Blocks its caller until [`Matcher::stop`];
    /// run it on a dedicated task.
    pub async fn run(&self) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(RoomForgeError::OperationFailed(
                "matcher is already running".to_string(),
            ));
        }

        let mut ticker = interval(TICK_INTERVAL);
        loop {
            ticker.tick().await;
            if !self.running.load(Ordering::SeqCst) {
                break;
            }
            self.tick().await;
        }
        tracing::info!("matcher tick loop exited");
        Ok(())
    }

    /// One matchmaking pass: drain both lanes, match them concurrently,
    /// join, then apply lane promotion to the team-queue leftovers.
    pub async fn tick(&self) {
        let normal_groups = self.normal.take_queuing();
        let team_groups = self.team.take_queuing();

        let normal = self.normal.clone();
        let team = self.team.clone();
        let normal_pass = tokio::spawn(async move { normal.match_groups(normal_groups) });
        let team_pass = tokio::spawn(async move { team.match_groups(team_groups) });

        let (normal_left, team_left) = match tokio::try_join!(normal_pass, team_pass) {
            Ok(leftovers) => leftovers,
            Err(e) => {
                tracing::error!(error = %e, "match pass failed");
                return;
            }
        };

        // Parties that outwaited their lane move to the normal queue.
        let now = self.clock.now_sec();
        for group in team_left {
            let elapsed = now - group.start_match_time_sec();
            let patience = match group.group_type() {
                GroupType::MaliciousTeam => self.config.malicious_team_wait_time_sec,
                GroupType::UnfriendlyTeam => self.config.unfriendly_team_wait_time_sec,
                GroupType::NormalTeam => self.config.normal_team_wait_time_sec,
                GroupType::NotTeam => i64::MAX,
            };
            if elapsed >= patience {
                tracing::debug!(group = %group.id(), elapsed, "promoting party to the normal lane");
                self.normal.add_groups(vec![group]);
            } else {
                self.team.add_groups(vec![group]);
            }
        }

        // Normal-lane leftovers retry unchanged next tick.
        self.normal.add_groups(normal_left);

        tracing::debug!(
            normal = ?self.normal.snapshot(),
            team = ?self.team.snapshot(),
            "tick complete"
        );
    }

    /// Graceful shutdown: both lanes drain and cancel their groups, then the
    /// tick loop is signalled to exit. Returns the leftovers per lane.
    pub fn stop(&self) -> (Vec<GroupRef>, Vec<GroupRef>) {
        let normal_left = self.normal.stop_match();
        let team_left = self.team.stop_match();
        self.running.store(false, Ordering::SeqCst);
        tracing::info!(
            normal_left = normal_left.len(),
            team_left = team_left.len(),
            "matcher stopped"
        );
        (normal_left, team_left)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}
