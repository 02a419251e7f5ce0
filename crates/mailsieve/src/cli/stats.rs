use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use mailsieve_lib::{Config, LabelStore, Result};

pub fn handle_stats_command(config: &Config) -> Result<()> {
    println!("\n{}", style("Labeled Data").bold().cyan());
    println!("{}\n", style("═".repeat(60)).dim());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Partition").fg(Color::Cyan),
        Cell::new("Records").fg(Color::Cyan),
        Cell::new("Invoices").fg(Color::Cyan),
        Cell::new("Not Invoices").fg(Color::Cyan),
        Cell::new("Path").fg(Color::Cyan),
    ]);

    add_partition_row(&mut table, "training", &config.training_store())?;
    add_partition_row(&mut table, "test", &config.test_store())?;

    println!("{table}");
    Ok(())
}

fn add_partition_row(table: &mut Table, name: &str, store: &LabelStore) -> Result<()> {
    if !store.path().exists() {
        table.add_row(vec![
            Cell::new(name),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new("-"),
            Cell::new(format!("{} (missing)", store.path().display())).fg(Color::Red),
        ]);
        return Ok(());
    }

    let dataset = store.load()?;
    table.add_row(vec![
        Cell::new(name),
        Cell::new(dataset.len()),
        Cell::new(dataset.positive_count()).fg(Color::Green),
        Cell::new(dataset.negative_count()).fg(Color::Yellow),
        Cell::new(store.path().display()),
    ]);
    Ok(())
}
