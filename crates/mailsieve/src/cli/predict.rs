use crate::util::with_spinner;
use console::style;
use mailsieve_lib::{Config, Result, TrainedModel};

pub fn handle_predict_command(config: &Config, subjects: &[String], verbose: bool) -> Result<()> {
    let training = config.training_store().load()?;

    let model = with_spinner(
        &format!("Training on {} labeled subjects", training.len()),
        verbose,
        || TrainedModel::train(&training, &config.features, &config.hyperparameters),
    )?;

    for subject in subjects {
        let prediction = model.predict(subject);
        let verdict = if prediction.label {
            style(prediction.verdict()).green()
        } else {
            style(prediction.verdict()).yellow()
        };

        println!("{} {}", style(">>>").cyan(), style(subject).bold());
        println!("  {}", verdict);
        if verbose {
            println!(
                "  p(invoice) = {:.3}, score = {:.3}",
                prediction.probability, prediction.score
            );
        }
    }

    Ok(())
}
