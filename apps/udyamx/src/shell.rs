//! # Terminal Shell
//!
//! Renders the active tab and turns typed lines into commands.
//!
//! ## Screen Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │ UdyamX                              ⚠ You are offline      🔔 2         │  header
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │   body of the active Tab (one render function per variant)              │  body
//! │                                                                         │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │ [Home] Co-Pilot  Invoice  Inventory  Schemes  Loans  Network            │  nav
//! └─────────────────────────────────────────────────────────────────────────┘
//!   ⚠ pending alerts are printed once, after the screen
//! ```
//!
//! While the voice recognizer is listening, a typed line is the heard
//! utterance, except `stop`, which cancels the session.
//!
//! `dictate` runs on its own task: the read loop keeps going so the typed
//! question can reach the recognizer, and the bot reply is printed when it
//! arrives.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use udyamx_core::dashboard::{sales_bars, SalesPeriod, ACHIEVEMENTS, TRUST_SCORE};
use udyamx_core::directory::{LOAN_PROVIDERS, SCHEMES};
use udyamx_core::i18n::Locale;
use udyamx_core::inventory::{ManualEntry, ScanOutcome};
use udyamx_core::voice::VoiceState;
use udyamx_core::{Money, Sender, Tab};

use crate::commands::{chat, dashboard, inventory, invoice, nav, profile};
use crate::error::{ApiError, ApiResult};
use crate::state::AppContext;
use crate::voice::console::Microphone;

const HELP: &str = "\
Navigation:  tab <home|copilot|invoice|inventory|schemes|loans|network|profile>
             bell                    toggle notifications
             open <n>                open notification n
             online | offline        report connectivity
Dashboard:   period <day|week|month>
Co-Pilot:    ask <question>          dictate
Invoice:     client <name>           add
             item <n> desc <text>    item <n> qty <q>    item <n> price <p>
             remove <n>              save    print
             voice                   stop
Inventory:   scan [code]             product <name> | <qty> | <price> [| <sku>]
Network:     search <text>
Profile:     lang <en|hi|mr>
             help    quit";

/// How long `dictate` waits for the recognizer to start listening.
const LISTEN_WAIT: Duration = Duration::from_secs(2);

/// Whether the read loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell {
    ctx: AppContext,
    mic: Option<Microphone>,
    dictation: Mutex<Option<JoinHandle<()>>>,
}

impl Shell {
    pub fn new(ctx: AppContext, mic: Option<Microphone>) -> Self {
        Shell {
            ctx,
            mic,
            dictation: Mutex::new(None),
        }
    }

    /// Reads lines until `quit` or end of input.
    pub async fn run<R>(&self, input: R) -> ApiResult<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        println!("{}", self.render().await);

        loop {
            let line = lines
                .next_line()
                .await
                .map_err(|e| ApiError::internal(format!("Cannot read input: {}", e)))?;
            let Some(line) = line else { break };

            match self.execute(&line).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => println!("{}", e),
            }

            if !self.is_listening() {
                println!("{}", self.render().await);
            }
            for alert in self.ctx.alerts.drain() {
                println!("⚠ {}", alert);
            }
        }

        self.finish_dictation().await;
        info!("Shell closed");
        Ok(())
    }

    fn is_listening(&self) -> bool {
        self.mic.as_ref().map_or(false, Microphone::is_listening)
    }

    // =========================================================================
    // Dictation
    // =========================================================================

    fn take_dictation(&self) -> Option<JoinHandle<()>> {
        self.dictation.lock().unwrap_or_else(PoisonError::into_inner).take()
    }

    /// Starts a dictated question on its own task and returns once the
    /// recognizer is waiting for it.
    async fn start_dictation(&self) {
        if let Some(previous) = self.take_dictation() {
            previous.abort();
        }

        let ctx = self.ctx.clone();
        let task = tokio::spawn(async move {
            match chat::ask_by_voice(&ctx).await {
                Ok(Some(reply)) => println!("🤖 {}", reply.text),
                Ok(None) => debug!("Dictation produced no question"),
                Err(e) => println!("{}", e),
            }
        });

        if let Some(mic) = &self.mic {
            let started = tokio::time::timeout(LISTEN_WAIT, async {
                while !mic.is_listening() && !task.is_finished() {
                    tokio::time::sleep(Duration::from_millis(5)).await;
                }
            })
            .await;
            if started.is_err() {
                warn!("Recognizer did not start listening for dictation");
            }
        }

        *self.dictation.lock().unwrap_or_else(PoisonError::into_inner) = Some(task);
    }

    /// Cancels a dictation that is still listening; otherwise lets its
    /// reply land.
    async fn finish_dictation(&self) {
        let Some(task) = self.take_dictation() else {
            return;
        };
        if self.is_listening() {
            task.abort();
        }
        let _ = task.await;
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub async fn execute(&self, line: &str) -> ApiResult<Flow> {
        let line = line.trim();

        if let Some(mic) = &self.mic {
            if mic.is_listening() && line != "stop" {
                mic.hear(line).await;
                return Ok(Flow::Continue);
            }
        }
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        debug!(command, "Shell command");
        let ctx = &self.ctx;

        match command.to_lowercase().as_str() {
            "quit" | "exit" => return Ok(Flow::Quit),
            "help" => println!("{}", HELP),

            "tab" | "go" => {
                nav::set_tab(ctx, rest);
            }
            "bell" => {
                nav::toggle_notifications(ctx);
            }
            "open" => {
                let n = parse_index(rest)?;
                let list = nav::list_notifications(ctx);
                let notification = list.get(n).ok_or_else(|| ApiError::not_found("Notification", rest))?;
                nav::open_notification(ctx, &notification.id);
            }
            "online" => {
                nav::set_online(ctx, true);
            }
            "offline" => {
                nav::set_online(ctx, false);
            }

            "period" => {
                dashboard::set_sales_period(ctx, rest)?;
            }
            "ask" => {
                ctx.nav.set_tab(Tab::Copilot);
                chat::send_message(ctx, rest).await?;
            }
            "dictate" => {
                ctx.nav.set_tab(Tab::Copilot);
                chat::require_speech(ctx)?;
                self.start_dictation().await;
            }

            "client" => {
                invoice::set_client_name(ctx, rest);
            }
            "add" => {
                invoice::add_item(ctx)?;
            }
            "item" => {
                let (index, field) = parse_item_edit(rest)?;
                invoice::edit_item(ctx, index, field)?;
            }
            "remove" => {
                invoice::remove_item(ctx, parse_index(rest)?)?;
            }
            "save" => {
                invoice::save_draft(ctx).await?;
            }
            "print" => {
                let path = invoice::print_invoice(ctx).await?;
                println!("🖨  {}", path.display());
            }
            "voice" => {
                ctx.nav.set_tab(Tab::Invoice);
                invoice::start_voice(ctx).await?;
            }
            "stop" => {
                if let Some(dictation) = self.take_dictation() {
                    dictation.abort();
                }
                invoice::stop_voice(ctx).await?;
            }

            "scan" => {
                ctx.nav.set_tab(Tab::Inventory);
                if rest.is_empty() {
                    println!("📷 {}", ctx.i18n.t("inventory.scanner.scanMessage"));
                }
                let outcome = if rest.is_empty() {
                    inventory::simulate_scan(ctx).await?
                } else {
                    inventory::scan_barcode(ctx, rest).await?
                };
                if let ScanOutcome::NeedsManualEntry { sku } = outcome {
                    println!(
                        "{}: {}  →  product <name> | <qty> | <price> | {}",
                        ctx.i18n.t("inventory.modal.addProduct"),
                        sku,
                        sku
                    );
                }
            }
            "product" => {
                inventory::add_product(ctx, parse_manual_entry(rest)?).await?;
            }

            "search" => {
                ctx.nav.set_tab(Tab::Network);
                dashboard::search_network(ctx, rest)?;
            }
            "lang" => {
                profile::set_locale(ctx, rest).await?;
            }

            other => {
                return Err(ApiError::validation(format!("Unknown command '{}' (try: help)", other)));
            }
        }

        Ok(Flow::Continue)
    }

    // =========================================================================
    // Output
    // =========================================================================

    pub async fn render(&self) -> String {
        let tab = self.ctx.nav.tab();
        let mut lines = self.header();

        if self.ctx.notifications.is_panel_open() {
            lines.extend(self.notifications_panel());
        }

        lines.push(String::new());
        let body = match tab {
            Tab::Dashboard => self.dashboard(),
            Tab::Copilot => self.copilot(),
            Tab::Invoice => self.invoice().await,
            Tab::Inventory => self.inventory().await,
            Tab::Network => self.network(),
            Tab::Schemes => self.schemes(),
            Tab::Loans => self.loans(),
            Tab::Profile => self.profile(),
        };
        lines.extend(body);
        lines.push(String::new());
        lines.push(self.bottom_nav(tab));

        lines.join("\n")
    }

    fn t(&self, key: &str) -> String {
        self.ctx.i18n.t(key)
    }

    fn header(&self) -> Vec<String> {
        let mut header = String::from("UdyamX");
        if !self.ctx.connectivity.is_online() {
            header.push_str(&format!("    ⚠ {}", self.t("offline")));
        }
        let unread = self.ctx.notifications.unread_count();
        if unread > 0 {
            header.push_str(&format!("    🔔 {}", unread));
        } else {
            header.push_str("    🔔");
        }
        vec![header, "─".repeat(60)]
    }

    fn notifications_panel(&self) -> Vec<String> {
        let mut lines = vec![format!("┌ {}", self.t("notifications.panel.title"))];
        let list = self.ctx.notifications.list();
        if list.is_empty() {
            lines.push(format!("│ {}", self.t("notifications.panel.empty")));
        }
        for (i, n) in list.iter().enumerate() {
            let marker = if n.read { " " } else { "•" };
            lines.push(format!("│ {}{}. {}: {}", marker, i + 1, n.title, n.message));
        }
        lines.push("└".to_string());
        lines
    }

    fn bottom_nav(&self, active: Tab) -> String {
        Tab::NAV
            .iter()
            .map(|tab| {
                let label = self.t(tab.nav_key());
                if *tab == active {
                    format!("[{}]", label)
                } else {
                    label
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }

    fn dashboard(&self) -> Vec<String> {
        let period = self.ctx.nav.sales_period();
        let mut lines = vec![
            self.t("dashboard.welcome"),
            format!(
                "{}: {}",
                self.t("dashboard.newsTicker.title"),
                self.t("dashboard.newsTicker.headlines")
            ),
            String::new(),
            format!("{}: {}/100", self.t("dashboard.trustScoreTitle"), TRUST_SCORE),
            self.t("dashboard.trustScoreDescription"),
            String::new(),
        ];

        let periods: Vec<String> = [SalesPeriod::Day, SalesPeriod::Week, SalesPeriod::Month]
            .iter()
            .map(|p| {
                let label = self.t(&format!("dashboard.salesAnalytics.{}", p.as_str()));
                if *p == period {
                    format!("[{}]", label)
                } else {
                    label
                }
            })
            .collect();
        lines.push(format!("{}   {}", self.t("dashboard.salesAnalytics.title"), periods.join(" ")));
        for bar in sales_bars(period) {
            let width = (bar.height_percent as usize * 30) / 100;
            lines.push(format!("  {:>3} {} {}", bar.label, "█".repeat(width.max(1)), bar.value));
        }
        lines.push(format!(
            "{}: {}",
            self.t("dashboard.salesAnalytics.aiInsightsTitle"),
            self.t(&period.insight_key())
        ));

        lines.push(String::new());
        lines.push(self.t("dashboard.journeyTitle"));
        for (key, done) in ACHIEVEMENTS {
            let status = if *done {
                format!("✔ {}", self.t("dashboard.status.completed"))
            } else {
                format!("… {}", self.t("dashboard.status.inProgress"))
            };
            lines.push(format!("  {}  ({})", self.t(key), status));
        }

        lines.push(String::new());
        lines.push(format!(
            "{}: {} (tab copilot) · {} (tab invoice)",
            self.t("dashboard.quickActionsTitle"),
            self.t("dashboard.actions.aiCopilot"),
            self.t("dashboard.actions.newInvoice")
        ));
        lines
    }

    fn copilot(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .ctx
            .chat
            .messages()
            .into_iter()
            .map(|m| match m.sender {
                Sender::Bot => format!("🤖 {}", m.text),
                Sender::User => format!("{:>60}", format!("{} 🧑", m.text)),
            })
            .collect();
        if self.ctx.chat.is_loading() {
            lines.push("🤖 ...".to_string());
        }
        lines.push(format!("› ask {}", self.t("copilot.placeholder")));
        lines
    }

    async fn invoice(&self) -> Vec<String> {
        let draft = invoice::get_draft(&self.ctx);
        let mut lines = vec![self.t("invoice.newInvoiceTitle")];

        match self.ctx.voice.state() {
            VoiceState::Idle => lines.push(format!("🎙  {} (voice)", self.t("invoice.generateWithVoice"))),
            VoiceState::Listening => lines.push(format!("🎙  {}", self.t("invoice.listening"))),
            _ => lines.push("🎙  ...".to_string()),
        }

        lines.push(format!("{}: {}", self.t("invoice.clientNameLabel"), draft.client_name));
        lines.push(self.t("invoice.itemsTitle"));
        for (i, item) in draft.items.iter().enumerate() {
            let description = if item.description.is_empty() {
                format!("<{}>", self.t("invoice.itemDescriptionPlaceholder"))
            } else {
                item.description.clone()
            };
            lines.push(format!(
                "  {}. {}  {} × {} = {}",
                i + 1,
                description,
                item.quantity,
                item.price,
                item.line_total()
            ));
        }
        lines.push(format!(
            "  + {} (add)   {} (save)   {} (print)",
            self.t("invoice.addItem"),
            self.t("invoice.saveDraft"),
            self.t("invoice.print")
        ));
        lines.push(format!("{}: {}", self.t("invoice.totalLabel"), draft.total));

        lines.push(String::new());
        lines.push(self.t("invoice.savedInvoicesTitle"));
        match invoice::list_invoices(&self.ctx).await {
            Ok(saved) if saved.is_empty() => lines.push(format!("  {}", self.t("invoice.noSavedInvoices"))),
            Ok(saved) => {
                for inv in saved.iter().rev() {
                    lines.push(format!(
                        "  {}  {}  [{}]",
                        inv.client_name,
                        inv.total,
                        self.t(inv.status.label_key())
                    ));
                }
            }
            Err(e) => lines.push(format!("  {}", e)),
        }
        lines
    }

    async fn inventory(&self) -> Vec<String> {
        let mut lines = vec![
            self.t("inventory.title"),
            format!("  {} (scan)   {} (product)", self.t("inventory.scan"), self.t("inventory.addManual")),
        ];
        match inventory::list_products(&self.ctx).await {
            Ok(products) if products.is_empty() => {
                lines.push(self.t("inventory.empty"));
                lines.push(self.t("inventory.empty_sub"));
            }
            Ok(products) => {
                for p in products {
                    lines.push(format!(
                        "  {}  ({})  {}: {}  {}",
                        p.name,
                        p.sku,
                        self.t("inventory.inStock"),
                        p.quantity,
                        p.price
                    ));
                }
            }
            Err(e) => lines.push(format!("  {}", e)),
        }
        lines
    }

    fn network(&self) -> Vec<String> {
        let query = self.ctx.nav.network_query();
        let mut lines = vec![
            self.t("network.title"),
            format!("🔍 {} {}", self.t("network.searchPlaceholder"), query),
        ];
        if let Ok(businesses) = dashboard::search_network(&self.ctx, &query) {
            for b in businesses {
                lines.push(format!("  {}  ·  {}  ·  {}  [{}]", b.name, b.category, b.distance, self.t("network.message")));
            }
        }
        lines
    }

    fn schemes(&self) -> Vec<String> {
        let mut lines = vec![self.t("schemes.title"), self.t("schemes.description")];
        for s in SCHEMES {
            lines.push(String::new());
            lines.push(format!("  {}", s.name));
            lines.push(format!("    {}", s.description));
            lines.push(format!("    {}: {}", self.t("schemes.eligibility"), s.eligibility));
            lines.push(format!("    {}: {}", self.t("schemes.learnMore"), s.link));
        }
        lines
    }

    fn loans(&self) -> Vec<String> {
        let mut lines = vec![self.t("loans.title"), self.t("loans.description")];
        for l in LOAN_PROVIDERS {
            lines.push(format!(
                "  {}  ·  {}: {}  ·  {}: {}  [{}]",
                l.name,
                self.t("loans.interestRate"),
                l.interest_rate,
                self.t("loans.minLoanAmount"),
                l.min_loan_amount,
                self.t("loans.applyNow")
            ));
        }
        lines
    }

    fn profile(&self) -> Vec<String> {
        let active = self.ctx.i18n.locale();
        let locales: Vec<String> = Locale::ALL
            .iter()
            .map(|l| {
                if *l == active {
                    format!("[{}]", l.display_name())
                } else {
                    l.display_name().to_string()
                }
            })
            .collect();

        vec![
            self.t("profile.title"),
            format!("  {}", self.t("profile.name")),
            format!("  {}", self.t("profile.email")),
            format!("  {}", self.t("profile.businessName")),
            format!("  {}", self.t("profile.joined")),
            String::new(),
            format!("{}: {}   (lang en|hi|mr)", self.t("profile.language.title"), locales.join(" ")),
            String::new(),
            format!("  {}", self.t("profile.actions.accountSettings")),
            format!("  {}", self.t("profile.actions.help")),
            format!("  {}", self.t("profile.actions.logout")),
        ]
    }
}

// =============================================================================
// Argument Parsing
// =============================================================================

/// 1-based row number → 0-based index.
fn parse_index(arg: &str) -> ApiResult<usize> {
    match arg.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(ApiError::validation(format!("Expected a row number, got '{}'", arg))),
    }
}

fn parse_quantity(arg: &str) -> ApiResult<i64> {
    arg.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("Expected a whole quantity, got '{}'", arg)))
}

/// `<n> desc <text>` | `<n> qty <q>` | `<n> price <p>`
fn parse_item_edit(args: &str) -> ApiResult<(usize, invoice::ItemField)> {
    let mut parts = args.splitn(3, char::is_whitespace);
    let index = parse_index(parts.next().unwrap_or_default())?;
    let field = parts.next().unwrap_or_default().to_lowercase();
    let value = parts.next().unwrap_or_default().trim();

    let field = match field.as_str() {
        "desc" | "description" => invoice::ItemField::Description(value.to_string()),
        "qty" | "quantity" => invoice::ItemField::Quantity(parse_quantity(value)?),
        "price" => invoice::ItemField::Price(Money::parse_decimal(value)?),
        other => return Err(ApiError::validation(format!("Unknown item field '{}'", other))),
    };
    Ok((index, field))
}

/// `<name> | <qty> | <price> [| <sku>]`
fn parse_manual_entry(args: &str) -> ApiResult<ManualEntry> {
    let parts: Vec<&str> = args.split('|').map(str::trim).collect();
    if parts.len() < 3 {
        return Err(ApiError::validation("Expected: product <name> | <qty> | <price> [| <sku>]"));
    }
    Ok(ManualEntry {
        name: parts[0].to_string(),
        quantity: parse_quantity(parts[1])?,
        price: Money::parse_decimal(parts[2])?,
        sku: parts.get(3).map(|s| s.to_string()).filter(|s| !s.is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{test_support, AppConfig};
    use crate::voice::console::ConsoleSpeech;
    use std::sync::Arc;
    use std::time::Duration;
    use udyamx_ai::CannedGateway;
    use udyamx_core::i18n::Translations;
    use udyamx_core::Notification;
    use udyamx_store::{Database, DbConfig};

    #[tokio::test]
    async fn test_header_shows_offline_and_unread_badge() {
        let ctx = test_support::context().await;
        ctx.notifications.push(Notification::new("a", "b", None));
        ctx.connectivity.set_online(false);
        let shell = Shell::new(ctx, None);

        let screen = shell.render().await;
        let header = screen.lines().next().unwrap();
        assert!(header.starts_with("UdyamX"));
        assert!(header.contains("offline"));
        assert!(header.contains("🔔 1"));
        assert!(screen.contains("[nav.home]"));
    }

    #[tokio::test]
    async fn test_editing_an_invoice_from_the_prompt() {
        let ctx = test_support::context().await;
        let shell = Shell::new(ctx.clone(), None);

        for line in [
            "tab invoice",
            "client Local Coffee Shop",
            "item 1 desc Croissant",
            "item 1 qty 2",
            "item 1 price 24",
            "save",
        ] {
            assert_eq!(shell.execute(line).await.unwrap(), Flow::Continue);
        }

        let saved = invoice::list_invoices(&ctx).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].total.paise(), 4800);
        assert!(shell.render().await.contains("Local Coffee Shop"));
    }

    #[tokio::test]
    async fn test_bad_arguments_are_validation_errors() {
        let shell = Shell::new(test_support::context().await, None);
        assert!(shell.execute("item x qty 2").await.is_err());
        assert!(shell.execute("item 1 price 1.999").await.is_err());
        assert!(shell.execute("product Soap | two | 5").await.is_err());
        assert!(shell.execute("frobnicate").await.is_err());
        assert_eq!(shell.execute("quit").await.unwrap(), Flow::Quit);
    }

    #[tokio::test]
    async fn test_every_tab_renders() {
        let ctx = test_support::context().await;
        let shell = Shell::new(ctx.clone(), None);
        for tab in ["home", "copilot", "invoice", "inventory", "schemes", "loans", "network", "profile"] {
            shell.execute(&format!("tab {}", tab)).await.unwrap();
            assert!(!shell.render().await.is_empty());
        }
        assert!(shell.render().await.contains("[English]"));
    }

    #[tokio::test]
    async fn test_typed_lines_become_speech_while_listening() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (backend, mic) = ConsoleSpeech::connect();
        let ctx = crate::state::AppContext::new(
            AppConfig::default(),
            db,
            Translations::empty(),
            Arc::new(CannedGateway::new()),
            Some(backend),
        )
        .await;
        let shell = Shell::new(ctx.clone(), Some(mic.clone()));

        shell.execute("voice").await.unwrap();
        for _ in 0..200 {
            if mic.is_listening() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(mic.is_listening());

        shell.execute("Sharma Traders").await.unwrap();
        for _ in 0..200 {
            if ctx.invoice.snapshot().client_name() == "Sharma Traders" {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(ctx.invoice.snapshot().client_name(), "Sharma Traders");

        shell.execute("stop").await.unwrap();
        for _ in 0..200 {
            if !ctx.voice.is_active() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(!ctx.voice.is_active());
    }

    #[tokio::test]
    async fn test_dictated_question_gets_a_reply() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let (backend, mic) = ConsoleSpeech::connect();
        let ctx = crate::state::AppContext::new(
            AppConfig::default(),
            db,
            Translations::empty(),
            Arc::new(CannedGateway::new()),
            Some(backend),
        )
        .await;
        let shell = Shell::new(ctx.clone(), Some(mic.clone()));

        let input: &[u8] = b"dictate\nHow should I price my samosas?\nquit\n";
        tokio::time::timeout(Duration::from_secs(5), shell.run(input))
            .await
            .expect("shell run finished")
            .unwrap();

        let messages = ctx.chat.messages();
        assert!(messages.len() > 1);
        assert_eq!(messages[1].text, "How should I price my samosas?");
        assert_eq!(messages[1].sender, Sender::User);
        assert_eq!(messages.last().unwrap().sender, Sender::Bot);
        assert!(!ctx.chat.is_loading());
        assert!(!mic.is_listening());
        assert_eq!(ctx.nav.tab(), Tab::Copilot);
    }

    #[tokio::test]
    async fn test_dictate_without_speech_is_unsupported() {
        let shell = Shell::new(test_support::context().await, None);
        let err = shell.execute("dictate").await.unwrap_err();
        assert_eq!(err.code, crate::error::ErrorCode::Unsupported);
    }
}
