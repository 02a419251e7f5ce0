use crate::util::with_spinner;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use mailsieve_lib::{
    format_accuracy, format_percent, Config, EvaluationReport, Result, TrainedModel,
};

pub fn handle_evaluate_command(config: &Config, json: bool, verbose: bool) -> Result<()> {
    let training = config.training_store().load()?;
    let test = config.test_store().load()?;

    let model = with_spinner(
        &format!("Training on {} labeled subjects", training.len()),
        verbose || json,
        || TrainedModel::train(&training, &config.features, &config.hyperparameters),
    )?;
    let report = model.evaluate(&test)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n{}", style(format_accuracy(report.accuracy)).bold());
    println!(
        "  {} of {} test subjects correct ({} training examples, {} features)\n",
        report.correct(),
        report.total,
        training.len(),
        model.transform().dimension()
    );

    print_confusion_matrix(&report);

    println!("  Precision: {}", style(format_percent(report.precision)).cyan());
    println!("  Recall: {}", style(format_percent(report.recall)).cyan());
    println!("  F1: {}", style(format!("{:.2}", report.f1)).cyan());

    Ok(())
}

fn print_confusion_matrix(report: &EvaluationReport) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("").fg(Color::Cyan),
        Cell::new("Predicted Invoice").fg(Color::Cyan),
        Cell::new("Predicted Not Invoice").fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Actual Invoice"),
        Cell::new(report.true_positives).fg(Color::Green),
        Cell::new(report.false_negatives).fg(Color::Red),
    ]);
    table.add_row(vec![
        Cell::new("Actual Not Invoice"),
        Cell::new(report.false_positives).fg(Color::Red),
        Cell::new(report.true_negatives).fg(Color::Green),
    ]);

    println!("{table}\n");
}
