//! Watch loop driving a status poller until the order settles.

use status_core::PollerHandle;
use status_types::StatusResolution;

/// Formats a status for output.
pub fn render(resolution: &StatusResolution, json: bool) -> String {
	if json {
		serde_json::to_string(resolution).unwrap_or_else(|_| resolution.to_string())
	} else {
		resolution.to_string()
	}
}

/// Reports every status change of `handle` to `on_change`.
///
/// Returns the last status once it is terminal (unless `follow` is set), once
/// an invalid status code is reported, or on Ctrl-C. The poller is stopped
/// before returning.
pub async fn run<F>(handle: PollerHandle, follow: bool, mut on_change: F) -> StatusResolution
where
	F: FnMut(&StatusResolution),
{
	let mut status_rx = handle.subscribe();
	let mut last = handle.current();

	loop {
		tokio::select! {
			changed = status_rx.changed() => {
				if changed.is_err() {
					tracing::warn!("Status poller exited");
					break;
				}

				last = *status_rx.borrow_and_update();
				on_change(&last);

				if matches!(last, StatusResolution::Invalid(_)) {
					break;
				}
				if last.is_terminal() && !follow {
					tracing::info!(status = %last, "Order reached a terminal status");
					break;
				}
			}
			_ = tokio::signal::ctrl_c() => {
				tracing::info!("Received shutdown signal");
				break;
			}
		}
	}

	handle.stop().await;
	last
}
