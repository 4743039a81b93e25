//! Navigation, notifications and connectivity commands.

use tracing::debug;
use udyamx_core::{Notification, Tab};

use crate::state::AppContext;

/// Switches view. Unknown tags land on the dashboard.
pub fn set_tab(ctx: &AppContext, tag: &str) -> Tab {
    let tab = tag.parse::<Tab>().unwrap_or_default();
    ctx.nav.set_tab(tab);
    tab
}

pub fn list_notifications(ctx: &AppContext) -> Vec<Notification> {
    ctx.notifications.list()
}

/// Opens or closes the notifications panel; returns whether it is open.
pub fn toggle_notifications(ctx: &AppContext) -> bool {
    ctx.notifications.toggle_panel()
}

/// Marks a notification read, closes the panel and opens its linked tab.
pub fn open_notification(ctx: &AppContext, id: &str) -> Option<Tab> {
    let tab = ctx.notifications.click(id)?;
    debug!(id, %tab, "Following notification link");
    ctx.nav.set_tab(tab);
    Some(tab)
}

/// Reports a connectivity transition from the host.
pub fn set_online(ctx: &AppContext, online: bool) -> bool {
    ctx.connectivity.set_online(online)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support;

    #[tokio::test]
    async fn test_unknown_tag_falls_back_to_dashboard() {
        let ctx = test_support::context().await;
        assert_eq!(set_tab(&ctx, "loans"), Tab::Loans);
        assert_eq!(set_tab(&ctx, "settings"), Tab::Dashboard);
        assert_eq!(ctx.nav.tab(), Tab::Dashboard);
    }

    #[tokio::test]
    async fn test_open_notification_routes_to_link() {
        let ctx = test_support::context().await;
        let notification = Notification::new("New scheme", "PMEGP", Some(Tab::Schemes));
        let id = notification.id.clone();
        ctx.notifications.push(notification);
        toggle_notifications(&ctx);

        assert_eq!(open_notification(&ctx, &id), Some(Tab::Schemes));
        assert_eq!(ctx.nav.tab(), Tab::Schemes);
        assert!(!ctx.notifications.is_panel_open());
        assert_eq!(ctx.notifications.unread_count(), 0);
    }
}
