//! Handler that turns a death into a custom message or a deferral.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use obituary_core::{DamageCause, DeathEvent, EntityId, KillKind};
use tracing::{debug, error, warn};

use super::EventContext;
use super::format::{MessageTokens, render};
use crate::api::errors::DeathError;

/// Why no custom message was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeferReason {
    /// The system is globally disabled.
    Disabled,
    /// The victim is not a player (mob deaths forwarded by the host).
    NotPlayer,
    /// The host did not report a cause.
    UnknownCause,
    /// The catalog has no pool for the cause.
    NoMessages,
    /// Every definition for the cause is disabled.
    AllDisabled,
    /// Composition failed; details were logged.
    Failed,
}

impl fmt::Display for DeferReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DeferReason::Disabled => "disabled",
            DeferReason::NotPlayer => "not a player",
            DeferReason::UnknownCause => "unknown cause",
            DeferReason::NoMessages => "no messages for cause",
            DeferReason::AllDisabled => "all messages disabled",
            DeferReason::Failed => "failed",
        };
        write!(f, "{}", label)
    }
}

/// A composed death message.
#[derive(Debug, Clone, PartialEq)]
pub struct DeathMessage {
    pub victim: EntityId,
    pub cause: DamageCause,
    pub kill: KillKind,
    pub killer: Option<EntityId>,
    pub killer_name: Option<String>,
    pub text: String,
}

/// What the host should display for a death.
#[derive(Debug, Clone, PartialEq)]
pub enum DeathOutcome {
    Message(DeathMessage),
    /// Show the host's own default message.
    Defer(DeferReason),
}

impl DeathOutcome {
    pub fn text(&self) -> Option<&str> {
        match self {
            DeathOutcome::Message(message) => Some(&message.text),
            DeathOutcome::Defer(_) => None,
        }
    }

    pub fn message(&self) -> Option<&DeathMessage> {
        match self {
            DeathOutcome::Message(message) => Some(message),
            DeathOutcome::Defer(_) => None,
        }
    }

    pub fn defer_reason(&self) -> Option<DeferReason> {
        match self {
            DeathOutcome::Message(_) => None,
            DeathOutcome::Defer(reason) => Some(*reason),
        }
    }
}

/// Player credited with a death.
struct Killer {
    id: EntityId,
    name: String,
    kind: KillKind,
}

/// Orchestrates one death: killer resolution, message selection, formatting.
///
/// # Flow
///
/// ```text
/// disabled?                      → Defer(Disabled)
/// victim not a player?           → Defer(NotPlayer)
/// no cause?                      → Defer(UnknownCause)
/// direct killer is a player?     → direct kill
///   else tracker has a record?   → indirect kill (record's damage type)
///   else                         → environmental
/// no pool for cause?             → Defer(NoMessages)
/// no enabled definition?         → Defer(AllDisabled)
/// pick text, substitute tokens, run placeholder service
/// ```
///
/// Errors and collaborator panics after the enabled check are caught, logged,
/// and returned as `Defer(Failed)`. The whole composition is timed against
/// the configured budget; overruns are logged and never change the result.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeathMessageEngine;

impl DeathMessageEngine {
    pub fn name(&self) -> &'static str {
        "death_message"
    }

    pub fn handle_death(&self, ctx: &EventContext<'_>, event: &DeathEvent) -> DeathOutcome {
        if !ctx.config.enabled {
            return DeathOutcome::Defer(DeferReason::Disabled);
        }

        let started = Instant::now();

        let outcome = match catch_unwind(AssertUnwindSafe(|| self.compose(ctx, event))) {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => {
                error!(
                    target: "obituary::death",
                    victim = %event.victim,
                    cause = ?event.cause,
                    direct_killer = ?event.direct_killer,
                    error = %e,
                    "Failed to compose death message, deferring to host"
                );
                DeathOutcome::Defer(DeferReason::Failed)
            }
            Err(panic) => {
                let e = DeathError::CollaboratorPanic(panic_message(panic.as_ref()));
                error!(
                    target: "obituary::death",
                    victim = %event.victim,
                    cause = ?event.cause,
                    direct_killer = ?event.direct_killer,
                    error = %e,
                    "Death message composition panicked, deferring to host"
                );
                DeathOutcome::Defer(DeferReason::Failed)
            }
        };

        let elapsed = started.elapsed();
        let budget = ctx.config.performance_budget();
        if elapsed > budget {
            warn!(
                target: "obituary::death",
                victim = %event.victim,
                elapsed_ms = elapsed.as_millis() as u64,
                budget_ms = budget.as_millis() as u64,
                "Death message handling exceeded its time budget"
            );
        }

        outcome
    }

    fn compose(&self, ctx: &EventContext<'_>, event: &DeathEvent) -> Result<DeathOutcome, DeathError> {
        if !ctx.oracle.is_player(event.victim) {
            return Ok(DeathOutcome::Defer(DeferReason::NotPlayer));
        }

        let Some(cause) = event.cause else {
            return Ok(DeathOutcome::Defer(DeferReason::UnknownCause));
        };

        let killer = resolve_killer(ctx, event);
        let kill = killer.as_ref().map_or(KillKind::Environmental, |k| k.kind);

        if !ctx.catalog.has_messages(cause) {
            debug!(
                target: "obituary::death",
                cause = %cause,
                "No messages configured for cause"
            );
            return Ok(DeathOutcome::Defer(DeferReason::NoMessages));
        }

        let Some(definition) = ctx.catalog.select_random(cause) else {
            debug!(
                target: "obituary::death",
                cause = %cause,
                "Every message for cause is disabled"
            );
            return Ok(DeathOutcome::Defer(DeferReason::AllDisabled));
        };

        let player = ctx
            .oracle
            .display_name(event.victim)
            .ok_or(DeathError::UnknownVictim(event.victim))?;
        let location = ctx.oracle.location(event.victim);

        let tokens = MessageTokens {
            player: &player,
            killer: killer.as_ref().map(|k| k.name.as_str()),
            location: location.as_ref(),
            damage_type: kill.damage_type(),
        };
        let formatted = render(definition.text_for(kill), &tokens);
        let text = ctx.placeholders.substitute(event.victim, &formatted);

        debug!(
            target: "obituary::death",
            victim = %event.victim,
            cause = %cause,
            kill = ?kill,
            "Composed death message"
        );

        Ok(DeathOutcome::Message(DeathMessage {
            victim: event.victim,
            cause,
            kill,
            killer: killer.as_ref().map(|k| k.id),
            killer_name: killer.map(|k| k.name),
            text,
        }))
    }
}

/// Direct player killer first; otherwise the tracker's most recent record.
///
/// A victim credited with their own death is not a player kill.
fn resolve_killer(ctx: &EventContext<'_>, event: &DeathEvent) -> Option<Killer> {
    let direct = event
        .direct_killer
        .filter(|id| *id != event.victim && ctx.oracle.is_player(*id));

    if let Some(id) = direct {
        let name = ctx
            .oracle
            .display_name(id)
            .unwrap_or_else(|| id.to_string());
        return Some(Killer {
            id,
            name,
            kind: KillKind::Direct,
        });
    }

    ctx.tracker
        .find_attributed_killer(event.victim)
        .map(|attribution| Killer {
            id: attribution.aggressor,
            name: ctx
                .oracle
                .display_name(attribution.aggressor)
                .unwrap_or(attribution.aggressor_name),
            kind: KillKind::Indirect(attribution.damage_type),
        })
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
