//! Tilt Ball
//!
//! This example drives a ball on a tilting table with a state machine.
//!
//! Key concepts:
//! - Graph built once in a setup callback: Start -> Free -> Captured -> Flushed
//! - Reaction hook toggling host-side flags when the ball changes state
//! - Per-tick behavior selected by the current state's label
//! - Contact events mapped to transition requests by tag
//! - Illegal requests handled as ordinary control flow
//!
//! Run with: cargo run --example tilt_ball

use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};
use tiltfsm::audit::audit;
use tiltfsm::builder::StateMachineBuilder;
use tiltfsm::{StateId, StateMachine};
use tracing::{info, warn};

/// What the host engine would apply to the ball's rigid body and renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct BodyFlags {
    simulated: bool,
    collider: bool,
    visible: bool,
}

struct Ball {
    machine: StateMachine,
    flags: Arc<Mutex<BodyFlags>>,
    free: StateId,
    captured: StateId,
    flushed: StateId,
    position: f32,
}

impl Ball {
    /// Setup callback: build the whole graph before the first tick.
    fn spawn() -> Result<Self, Box<dyn Error>> {
        let flags = Arc::new(Mutex::new(BodyFlags::default()));
        let poses: Arc<Mutex<HashMap<StateId, BodyFlags>>> = Arc::default();

        let hook_flags = Arc::clone(&flags);
        let hook_poses = Arc::clone(&poses);
        let mut machine = StateMachineBuilder::new()
            .history_capacity(16)
            .on_transition(move |_, to| {
                let poses = hook_poses.lock().unwrap_or_else(|e| e.into_inner());
                if let Some(pose) = poses.get(&to) {
                    *hook_flags.lock().unwrap_or_else(|e| e.into_inner()) = *pose;
                }
            })
            .build()?;

        let start = machine.start();
        let free = machine.add_state("Free");
        let captured = machine.add_state("Captured");
        let flushed = machine.add_state("Flushed");
        machine.chain(start)?.to(free)?.to(captured)?.to(flushed)?;

        {
            let mut poses = poses.lock().unwrap_or_else(|e| e.into_inner());
            poses.insert(
                free,
                BodyFlags {
                    simulated: true,
                    collider: true,
                    visible: true,
                },
            );
            poses.insert(
                captured,
                BodyFlags {
                    simulated: false,
                    collider: true,
                    visible: true,
                },
            );
            poses.insert(flushed, BodyFlags::default());
        }

        machine.subscribe(|from, to, m| {
            info!(
                from = m.label(from).unwrap_or_default(),
                to = m.label(to).unwrap_or_default(),
                "ball changed state"
            );
        });

        Ok(Self {
            machine,
            flags,
            free,
            captured,
            flushed,
            position: 0.0,
        })
    }

    /// Per-tick callback.
    fn tick(&mut self, tilt: f32) {
        match self.machine.current_label() {
            "Free" => self.position += tilt,
            "Captured" => self.position = self.position.round(),
            _ => {}
        }
    }

    /// Contact callback, keyed by the other collider's tag.
    fn on_contact(&mut self, tag: &str) {
        let target = match tag {
            "Launcher" => self.free,
            "Capturer" => self.captured,
            "Flusher" => self.flushed,
            _ => return,
        };

        if let Err(err) = self.machine.request_transition(target) {
            warn!(tag, error = %err, "contact ignored");
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    println!("=== Tilt Ball ===\n");

    let mut ball = match Ball::spawn() {
        Ok(ball) => ball,
        Err(err) => {
            eprintln!("failed to build ball: {err}");
            return;
        }
    };

    let script: [(u32, Option<&str>, f32); 8] = [
        (0, Some("Launcher"), 0.0),
        (1, None, 0.4),
        (2, Some("Flusher"), 0.3),
        (3, None, -0.2),
        (4, Some("Capturer"), 0.0),
        (5, None, 0.5),
        (6, Some("Flusher"), 0.0),
        (7, Some("Capturer"), 0.0),
    ];

    for (tick, contact, tilt) in script {
        if let Some(tag) = contact {
            ball.on_contact(tag);
        }
        ball.tick(tilt);
        let flags = *ball.flags.lock().unwrap_or_else(|e| e.into_inner());
        println!(
            "tick {tick}: state={:<8} position={:>5.2} flags={:?}",
            ball.machine.current_label(),
            ball.position,
            flags
        );
    }

    println!("\nPath taken:");
    for state in ball.machine.history().get_path() {
        println!("  {}", ball.machine.label(state).unwrap_or("?"));
    }

    println!("\nGraph audit clean: {}", audit(&ball.machine).is_success());
    println!("\n=== Example Complete ===");
}
