use codestroke_core::dosing::{self, BodyWeight};

pub fn run(weight: BodyWeight) -> eyre::Result<()> {
    if !weight.is_positive() {
        return Err(eyre::eyre!("weight must be positive"));
    }
    let summary = dosing::dosing_summary(&weight);
    println!("Weight: {:.1} kg", summary.weight_kg);
    println!(
        "Alteplase: {:.1} mg total, {:.1} mg bolus, {:.1} mg infusion over 60 min",
        summary.alteplase.total_mg, summary.alteplase.bolus_mg, summary.alteplase.infusion_mg
    );
    println!("Tenecteplase: {:.1} mg single bolus", summary.tenecteplase_mg);
    Ok(())
}
