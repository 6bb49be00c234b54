use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::Utc;
use thiserror::Error;

use stockledger_core::DomainError;
use stockledger_inventory::{exceeds_stock, MovementRecord, SharedLedger};

use crate::config::ConsoleConfig;
use crate::{export, render};

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("console io failed: {0}")]
    Io(#[from] io::Error),

    #[error("failed to write report {}: {source}", path.display())]
    Export { path: PathBuf, source: io::Error },
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuOption {
    RegisterItem,
    StockEntry,
    StockExit,
    LookUpItem,
    ListItems,
    ItemMovements,
    AllMovements,
    InventoryReport,
    ExportInventoryReport,
    ExportItemReport,
    Quit,
}

impl MenuOption {
    pub const ALL: [MenuOption; 11] = [
        MenuOption::RegisterItem,
        MenuOption::StockEntry,
        MenuOption::StockExit,
        MenuOption::LookUpItem,
        MenuOption::ListItems,
        MenuOption::ItemMovements,
        MenuOption::AllMovements,
        MenuOption::InventoryReport,
        MenuOption::ExportInventoryReport,
        MenuOption::ExportItemReport,
        MenuOption::Quit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        let n: usize = input.trim().parse().ok()?;
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuOption::RegisterItem => "Register new item",
            MenuOption::StockEntry => "Stock entry",
            MenuOption::StockExit => "Stock exit",
            MenuOption::LookUpItem => "Look up item",
            MenuOption::ListItems => "List all items",
            MenuOption::ItemMovements => "Movements of an item",
            MenuOption::AllMovements => "All movements",
            MenuOption::InventoryReport => "Inventory report",
            MenuOption::ExportInventoryReport => "Export inventory report to file",
            MenuOption::ExportItemReport => "Export item report to file",
            MenuOption::Quit => "Quit",
        }
    }
}

/// Parse an operator-typed quantity; only positive finite numbers pass.
pub fn parse_quantity(input: &str) -> Result<f64, &'static str> {
    let value: f64 = input
        .trim()
        .parse()
        .map_err(|_| "Error: enter a valid number")?;
    if !value.is_finite() || value <= 0.0 {
        return Err("Error: quantity must be greater than 0");
    }
    Ok(value)
}

/// Menu-driven session over one ledger.
///
/// Input is read line by line; end of input ends the session.
pub struct Console<R, W> {
    ledger: SharedLedger,
    config: ConsoleConfig,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(ledger: SharedLedger, config: ConsoleConfig, input: R, output: W) -> Self {
        Self {
            ledger,
            config,
            input,
            output,
        }
    }

    pub fn ledger(&self) -> &SharedLedger {
        &self.ledger
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn run(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "Welcome to the inventory system!")?;

        loop {
            self.show_menu()?;
            let Some(choice) = self.prompt("\nSelect an option (1-11): ")? else {
                break;
            };

            match MenuOption::parse(&choice) {
                Some(MenuOption::Quit) => {
                    writeln!(self.output, "\nGoodbye!")?;
                    break;
                }
                Some(option) => {
                    tracing::debug!(option = option.label(), "menu option selected");
                    self.dispatch(option)?;
                }
                None => writeln!(
                    self.output,
                    "Invalid option. Please choose an option from 1 to 11."
                )?,
            }
        }
        Ok(())
    }

    fn show_menu(&mut self) -> ConsoleResult<()> {
        let bar = "=".repeat(50);
        writeln!(self.output, "\n{bar}")?;
        writeln!(self.output, "    INVENTORY SYSTEM")?;
        writeln!(self.output, "{bar}")?;
        for (i, option) in MenuOption::ALL.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, option.label())?;
        }
        writeln!(self.output, "{bar}")?;
        Ok(())
    }

    fn dispatch(&mut self, option: MenuOption) -> ConsoleResult<()> {
        match option {
            MenuOption::RegisterItem => self.register_item(),
            MenuOption::StockEntry => self.stock_entry(),
            MenuOption::StockExit => self.stock_exit(),
            MenuOption::LookUpItem => self.look_up_item(),
            MenuOption::ListItems => self.list_items(),
            MenuOption::ItemMovements => self.item_movements(),
            MenuOption::AllMovements => self.all_movements(),
            MenuOption::InventoryReport => self.inventory_report(),
            MenuOption::ExportInventoryReport => self.export_inventory_report(),
            MenuOption::ExportItemReport => self.export_item_report(),
            MenuOption::Quit => Ok(()),
        }
    }

    /// Print `label` and read one trimmed line. `None` at end of input.
    fn prompt(&mut self, label: &str) -> ConsoleResult<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Item codes are case-insensitive at the console: always upper-cased.
    fn prompt_code(&mut self) -> ConsoleResult<Option<String>> {
        Ok(self.prompt("Item code: ")?.map(|c| c.to_uppercase()))
    }

    fn register_item(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- REGISTER NEW ITEM ---")?;
        let Some(code) = self.prompt_code()? else { return Ok(()) };
        if code.is_empty() {
            writeln!(self.output, "Error: the code cannot be empty")?;
            return Ok(());
        }
        let Some(name) = self.prompt("Item name: ")? else { return Ok(()) };
        if name.is_empty() {
            writeln!(self.output, "Error: the name cannot be empty")?;
            return Ok(());
        }
        let Some(description) = self.prompt("Description: ")? else { return Ok(()) };
        let Some(unit) = self.prompt("Unit of measure (e.g. unit, kg): ")? else {
            return Ok(());
        };
        let unit = if unit.is_empty() { "unit".to_string() } else { unit };

        match self.ledger.register_item(code.as_str(), name.as_str(), description, unit) {
            Ok(_) => writeln!(self.output, "Item '{name}' registered successfully")?,
            Err(DomainError::DuplicateItem(_)) => {
                writeln!(self.output, "Error: an item with code '{code}' already exists")?
            }
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(())
    }

    fn stock_entry(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- STOCK ENTRY ---")?;
        self.movement(false)
    }

    fn stock_exit(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- STOCK EXIT ---")?;
        self.movement(true)
    }

    fn movement(&mut self, exit: bool) -> ConsoleResult<()> {
        let Some(code) = self.prompt_code()? else { return Ok(()) };
        let Some(item) = self.ledger.get_item(&code) else {
            writeln!(self.output, "Error: no item exists with code '{code}'")?;
            return Ok(());
        };
        writeln!(
            self.output,
            "Item: {} (current stock: {} {})",
            item.name, item.quantity, item.unit_of_measure
        )?;

        let label = if exit { "Quantity to remove: " } else { "Quantity to add: " };
        let Some(raw) = self.prompt(label)? else { return Ok(()) };
        let quantity = match parse_quantity(&raw) {
            Ok(q) => q,
            Err(msg) => {
                writeln!(self.output, "{msg}")?;
                return Ok(());
            }
        };

        if exit && exceeds_stock(quantity, item.quantity) {
            writeln!(
                self.output,
                "Error: insufficient stock. Available: {} {}",
                item.quantity, item.unit_of_measure
            )?;
            return Ok(());
        }

        let Some(reason) = self.prompt("Reason (optional): ")? else { return Ok(()) };
        let reason = (!reason.is_empty()).then_some(reason);
        let actor = Some(self.config.actor.clone());

        let result = if exit {
            self.ledger.record_exit(code.as_str(), quantity, reason, actor)
        } else {
            self.ledger.record_entry(code.as_str(), quantity, reason, actor)
        };

        match result {
            Ok(recorded) => {
                let what = if exit { "Exit" } else { "Entry" };
                writeln!(self.output, "{what} recorded successfully")?;
                writeln!(
                    self.output,
                    "  Previous stock: {} {}",
                    recorded.previous_stock, item.unit_of_measure
                )?;
                writeln!(
                    self.output,
                    "  Current stock: {} {}",
                    recorded.stock, item.unit_of_measure
                )?;
            }
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(())
    }

    fn look_up_item(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- LOOK UP ITEM ---")?;
        let Some(code) = self.prompt_code()? else { return Ok(()) };
        let Some(item) = self.ledger.get_item(&code) else {
            writeln!(self.output, "Error: no item exists with code '{code}'")?;
            return Ok(());
        };
        writeln!(self.output, "\nItem details:")?;
        writeln!(self.output, "  Code: {}", item.code)?;
        writeln!(self.output, "  Name: {}", item.name)?;
        writeln!(self.output, "  Description: {}", item.description)?;
        writeln!(
            self.output,
            "  Current stock: {} {}",
            item.quantity, item.unit_of_measure
        )?;
        Ok(())
    }

    fn list_items(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- ITEM LIST ---")?;
        let items = self.ledger.list_items();
        if items.is_empty() {
            writeln!(self.output, "No items registered in the inventory")?;
        } else {
            write!(self.output, "{}", render::item_table(&items))?;
        }
        Ok(())
    }

    fn item_movements(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- ITEM MOVEMENTS ---")?;
        let Some(code) = self.prompt_code()? else { return Ok(()) };
        let Some(item) = self.ledger.get_item(&code) else {
            writeln!(self.output, "Error: no item exists with code '{code}'")?;
            return Ok(());
        };

        let movements = self.ledger.movements_for(&code);
        if movements.is_empty() {
            writeln!(self.output, "No movements recorded for item '{}'", item.name)?;
            return Ok(());
        }
        writeln!(self.output, "\nMovements of item: {}", item.name)?;
        write!(self.output, "{}", render::item_movements_table(&movements))?;
        Ok(())
    }

    fn all_movements(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- ALL MOVEMENTS ---")?;
        let movements = self.ledger.all_movements();
        if movements.is_empty() {
            writeln!(self.output, "No movements recorded")?;
        } else {
            write!(self.output, "{}", render::movements_table(&movements))?;
        }
        Ok(())
    }

    fn inventory_report_text(&self) -> String {
        let (report, movements) = self.ledger.with_ledger(|l| {
            let movements: Vec<_> = l.movements().iter().map(MovementRecord::describe).collect();
            (l.build_report(), movements)
        });
        render::inventory_report(&report, &movements, self.config.recent_movements)
    }

    fn inventory_report(&mut self) -> ConsoleResult<()> {
        writeln!(self.output)?;
        let text = self.inventory_report_text();
        write!(self.output, "{text}")?;
        Ok(())
    }

    fn export_inventory_report(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- EXPORT INVENTORY REPORT ---")?;
        let text = self.inventory_report_text();
        let file_name = export::inventory_report_file_name(Utc::now());
        let written = export::write_report(&self.config.report_dir, &file_name, &text);
        self.report_written(written)
    }

    fn export_item_report(&mut self) -> ConsoleResult<()> {
        writeln!(self.output, "\n--- EXPORT ITEM REPORT ---")?;
        let Some(code) = self.prompt_code()? else { return Ok(()) };
        let Some(item) = self.ledger.get_item(&code) else {
            writeln!(self.output, "Error: no item exists with code '{code}'")?;
            return Ok(());
        };
        let now = Utc::now();
        let movements = self.ledger.movements_for(&code);
        let text = render::item_report(&item, &movements, now);
        let file_name = export::item_report_file_name(&code, now);
        let written = export::write_report(&self.config.report_dir, &file_name, &text);
        self.report_written(written)
    }

    /// A failed export is reported to the operator; the session goes on.
    fn report_written(&mut self, written: ConsoleResult<PathBuf>) -> ConsoleResult<()> {
        match written {
            Ok(path) => writeln!(self.output, "Report written to {}", path.display())?,
            Err(err) => {
                tracing::warn!(error = %err, "report export failed");
                writeln!(self.output, "Error: {err}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn session(script: &str) -> (SharedLedger, String) {
        session_with(ConsoleConfig::default(), script)
    }

    fn session_with(config: ConsoleConfig, script: &str) -> (SharedLedger, String) {
        let ledger = SharedLedger::new();
        let mut console = Console::new(
            ledger.clone(),
            config,
            Cursor::new(script.as_bytes().to_vec()),
            Vec::new(),
        );
        console.run().unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        (ledger, out)
    }

    #[test]
    fn parse_menu_options() {
        assert_eq!(MenuOption::parse("1"), Some(MenuOption::RegisterItem));
        assert_eq!(MenuOption::parse(" 10 "), Some(MenuOption::ExportItemReport));
        assert_eq!(MenuOption::parse("11"), Some(MenuOption::Quit));
        assert_eq!(MenuOption::parse("0"), None);
        assert_eq!(MenuOption::parse("12"), None);
        assert_eq!(MenuOption::parse("abc"), None);
    }

    #[test]
    fn parse_quantity_rules() {
        assert_eq!(parse_quantity(" 2.5 "), Ok(2.5));
        assert!(parse_quantity("0").is_err());
        assert!(parse_quantity("-3").is_err());
        assert!(parse_quantity("ten").is_err());
        assert!(parse_quantity("inf").is_err());
    }

    #[test]
    fn register_entry_exit_flow() {
        let script = "1\na1\nBolt\nsteel bolt\nunit\n\
                      2\nA1\n10\n\n\
                      3\na1\n3\nsold\n\
                      3\nA1\n100\n\
                      11\n";
        let (ledger, out) = session(script);

        assert_eq!(ledger.current_stock("A1"), Some(7.0));
        let history = ledger.movements_for("A1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].reason, "Stock entry");
        assert_eq!(history[1].reason, "sold");
        assert_eq!(history[1].actor, "admin");

        assert!(out.contains("Item 'Bolt' registered successfully"));
        assert!(out.contains("Previous stock: 10 unit"));
        assert!(out.contains("Current stock: 7 unit"));
        assert!(out.contains("Error: insufficient stock. Available: 7 unit"));
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn duplicate_and_unknown_codes_are_reported() {
        let script = "1\nA1\nBolt\n\n\n1\nA1\nNut\n\n\n2\nZZ\n4\nA1\n11\n";
        let (ledger, out) = session(script);

        assert!(out.contains("Error: an item with code 'A1' already exists"));
        assert!(out.contains("Error: no item exists with code 'ZZ'"));
        assert!(out.contains("Name: Bolt"));
        assert_eq!(ledger.get_item("A1").unwrap().unit_of_measure, "unit");
    }

    #[test]
    fn invalid_quantities_create_no_movement() {
        let script = "1\nA1\nBolt\n\n\n2\nA1\n0\n2\nA1\n-5\n2\nA1\nabc\n11\n";
        let (ledger, out) = session(script);

        assert!(ledger.all_movements().is_empty());
        assert!(out.contains("Error: quantity must be greater than 0"));
        assert!(out.contains("Error: enter a valid number"));
    }

    #[test]
    fn reports_and_listings_render() {
        let script = "1\nA1\nBolt\n\n\n2\nA1\n5\n\n5\n6\nA1\n7\n8\n11\n";
        let (_, out) = session(script);

        assert!(out.contains("--- ITEM LIST ---"));
        assert!(out.contains("Movements of item: Bolt"));
        assert!(out.contains("INVENTORY REPORT"));
        assert!(out.contains("Total movements: 1"));
    }

    fn report_files(dir: &std::path::Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn reports_are_exported_to_the_report_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConsoleConfig {
            report_dir: dir.path().join("out"),
            ..ConsoleConfig::default()
        };
        let script = "1\nA1\nBolt\n\n\n2\nA1\n5\n\n9\n10\na1\n10\nZZ\n11\n";
        let (_, out) = session_with(config, script);

        let names = report_files(&dir.path().join("out"));
        assert_eq!(names.len(), 2, "{names:?}");
        assert!(names[0].starts_with("inventory_report_") && names[0].ends_with(".txt"));
        assert!(names[1].starts_with("item_report_A1_") && names[1].ends_with(".txt"));

        let inventory = std::fs::read_to_string(dir.path().join("out").join(&names[0])).unwrap();
        assert!(inventory.contains("Total movements: 1"));
        let item = std::fs::read_to_string(dir.path().join("out").join(&names[1])).unwrap();
        assert!(item.contains("ITEM REPORT: Bolt"));
        assert!(item.contains("Current stock:   5 unit"));

        assert_eq!(out.matches("Report written to").count(), 2);
        assert!(out.contains("Error: no item exists with code 'ZZ'"));
    }

    #[test]
    fn failed_export_is_reported_and_session_continues() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("reports");
        std::fs::write(&blocker, "").unwrap();
        let config = ConsoleConfig {
            report_dir: blocker,
            ..ConsoleConfig::default()
        };

        let (_, out) = session_with(config, "9\n5\n11\n");
        assert!(out.contains("Error: failed to write report"));
        assert!(out.contains("No items registered in the inventory"));
        assert!(out.contains("Goodbye!"));
    }

    /// Scripted input that runs `hook` just before line `trigger_at` is read.
    struct Interleaved<F: FnMut()> {
        inner: Cursor<Vec<u8>>,
        lines_read: usize,
        trigger_at: usize,
        hook: Option<F>,
    }

    impl<F: FnMut()> Read for Interleaved<F> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.inner.read(buf)
        }
    }

    impl<F: FnMut()> BufRead for Interleaved<F> {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.lines_read == self.trigger_at {
                if let Some(mut hook) = self.hook.take() {
                    hook();
                }
            }
            self.inner.fill_buf()
        }

        fn consume(&mut self, amt: usize) {
            let pos = self.inner.position() as usize;
            let consumed = &self.inner.get_ref()[pos..pos + amt];
            self.lines_read += consumed.iter().filter(|&&b| b == b'\n').count();
            self.inner.consume(amt);
        }
    }

    #[test]
    fn previous_stock_reflects_concurrent_writers() {
        let ledger = SharedLedger::new();
        let other = ledger.clone();
        // Line 12 is the exit's reason prompt, after the stock was shown.
        let script = "1\nA1\nBolt\n\n\n2\nA1\n10\n\n3\nA1\n4\n\n11\n";
        let input = Interleaved {
            inner: Cursor::new(script.as_bytes().to_vec()),
            lines_read: 0,
            trigger_at: 12,
            hook: Some(move || {
                other.record_entry("A1", 5.0, None, Some("other".into())).unwrap();
            }),
        };

        let mut console = Console::new(ledger.clone(), ConsoleConfig::default(), input, Vec::new());
        console.run().unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();

        assert!(out.contains("Item: Bolt (current stock: 10 unit)"));
        assert!(out.contains("Previous stock: 15 unit"), "{out}");
        assert!(out.contains("Current stock: 11 unit"));
        assert_eq!(ledger.current_stock("A1"), Some(11.0));
    }

    #[test]
    fn decimal_stock_can_be_drawn_to_zero() {
        let script = "1\nA1\nBolt\n\nkg\n2\nA1\n0.3\n\n3\nA1\n0.1\n\n3\nA1\n0.2\n\n11\n";
        let (ledger, out) = session(script);

        assert_eq!(ledger.current_stock("A1"), Some(0.0));
        assert_eq!(ledger.movements_for("A1").len(), 3);
        assert!(!out.contains("insufficient stock"));
        assert!(out.contains("Current stock: 0 kg"));
    }

    #[test]
    fn end_of_input_ends_session() {
        let (ledger, out) = session("1\nA1\n");
        assert_eq!(ledger.list_items().len(), 0);
        assert!(!out.contains("Goodbye!"));
    }

    #[test]
    fn invalid_option_is_reported() {
        let (_, out) = session("42\n11\n");
        assert!(out.contains("Invalid option"));
    }
}
