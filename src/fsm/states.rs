//! Concrete link state handlers and table builder.
//!
//! ```text
//!  IDLE ──[next tick]──▶ SCANNING ──[connect + arm ok]──▶ CONNECTED
//!    ▲                    │    ▲                              │
//!    │                    └────┘                              │
//!    │              [connect failed: rescan next tick]        │
//!    └──────────────────────[link lost]───────────────────────┘
//! ```
//!
//! Retries have no backoff: a failed attempt rescans on the very next tick.

use super::context::LinkContext;
use super::{StateDescriptor, StateId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // Index 0 — Idle
        StateDescriptor {
            id: StateId::Idle,
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // Index 1 — Scanning
        StateDescriptor {
            id: StateId::Scanning,
            name: "Scanning",
            on_enter: Some(scanning_enter),
            on_exit: None,
            on_update: scanning_update,
        },
        // Index 2 — Connected
        StateDescriptor {
            id: StateId::Connected,
            name: "Connected",
            on_enter: Some(connected_enter),
            on_exit: Some(connected_exit),
            on_update: connected_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(_ctx: &mut LinkContext) {
    info!("IDLE: no link, scan restarts next tick");
}

fn idle_update(ctx: &mut LinkContext) -> Option<StateId> {
    // Nothing reported while idle is meaningful.
    let _ = ctx.inputs.take();
    Some(StateId::Scanning)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SCANNING
// ═══════════════════════════════════════════════════════════════════════════

fn scanning_enter(ctx: &mut LinkContext) {
    ctx.commands.start_scan = true;
    ctx.rescan_pending = false;
    info!("SCANNING: looking for heart-rate service");
}

fn scanning_update(ctx: &mut LinkContext) -> Option<StateId> {
    let inputs = ctx.inputs.take();

    if let Some(outcome) = inputs.connect_outcome {
        ctx.connect_attempts = ctx.connect_attempts.wrapping_add(1);
        match outcome {
            Ok(()) => return Some(StateId::Connected),
            Err(e) => {
                ctx.failed_connects = ctx.failed_connects.wrapping_add(1);
                ctx.rescan_pending = true;
                warn!(
                    "SCANNING: attempt {} failed ({}), rescanning next tick",
                    ctx.connect_attempts, e
                );
                return None;
            }
        }
    }

    if inputs.scan_failed || ctx.rescan_pending {
        if inputs.scan_failed {
            warn!("SCANNING: scan start failed, retrying");
        }
        ctx.rescan_pending = false;
        ctx.commands.start_scan = true;
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  CONNECTED
// ═══════════════════════════════════════════════════════════════════════════

fn connected_enter(ctx: &mut LinkContext) {
    info!(
        "CONNECTED: notifications armed (attempt {})",
        ctx.connect_attempts
    );
}

fn connected_exit(ctx: &mut LinkContext) {
    ctx.commands.flush_samples = true;
    info!("CONNECTED: link lost, dropping in-flight samples");
}

fn connected_update(ctx: &mut LinkContext) -> Option<StateId> {
    let inputs = ctx.inputs.take();

    if inputs.link_lost {
        return Some(StateId::Idle);
    }

    None
}
