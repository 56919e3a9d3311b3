//! Asynchronous command intake.
//!
//! Remote control adapters (MQTT bridge, serial console, provisioning
//! callbacks) run outside the control tick and must never touch control
//! state directly.  They enqueue decoded [`AppCommand`]s here; the main
//! loop drains the queue once per tick, so every command executes inside
//! the single-threaded control context.
//!
//! ```text
//! ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ Remote rx    │────▶│              │     │              │
//! │ Serial rx    │────▶│ Command Queue│────▶│  Tick Loop   │
//! │ Callbacks    │────▶│  (lock-free) │     │  (consumer)  │
//! └──────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The queue is a fixed-capacity lock-free MPMC ring; a full queue drops
//! the command (the remote layer retries or re-publishes state).

use heapless::mpmc::MpMcQueue;

use crate::app::commands::AppCommand;

/// Maximum number of pending commands.  Power of 2, required by the ring.
const COMMAND_QUEUE_CAP: usize = 8;

static COMMAND_QUEUE: MpMcQueue<AppCommand, COMMAND_QUEUE_CAP> = MpMcQueue::new();

/// Enqueue a command from any context (safe from callbacks and ISRs).
/// Returns `false` if the queue is full (command dropped).
pub fn push_command(cmd: AppCommand) -> bool {
    COMMAND_QUEUE.enqueue(cmd).is_ok()
}

/// Drain all pending commands into a handler, FIFO order.
/// Called from the tick loop (the single logical consumer).
pub fn drain_commands(mut handler: impl FnMut(AppCommand)) {
    while let Some(cmd) = COMMAND_QUEUE.dequeue() {
        handler(cmd);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::ChannelGroup;

    // The queue is a process-wide static, so these tests must not run in
    // parallel with each other.  A single test exercises the whole API.
    #[test]
    fn fifo_order_and_overflow() {
        drain_commands(|_| {});

        for i in 0..COMMAND_QUEUE_CAP as i16 {
            assert!(push_command(AppCommand::Adjust {
                group: ChannelGroup::All,
                delta: i,
            }));
        }
        // Queue is full; the next push must be rejected, not block.
        assert!(!push_command(AppCommand::SaveConfig));

        let mut deltas = Vec::new();
        drain_commands(|cmd| {
            if let AppCommand::Adjust { delta, .. } = cmd {
                deltas.push(delta);
            }
        });
        let expected: Vec<i16> = (0..COMMAND_QUEUE_CAP as i16).collect();
        assert_eq!(deltas, expected);
    }
}
