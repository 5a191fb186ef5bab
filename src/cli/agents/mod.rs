//! Agents command - lists the specialists

use crate::domain::specialist::specialist_catalogue;

/// Run the agents command
pub async fn run() -> anyhow::Result<()> {
    for profile in specialist_catalogue() {
        println!("{} ({})", profile.name, profile.category);
        println!("  {}", profile.description);
        println!("  specialties: {}", profile.specialties.join(", "));
    }

    Ok(())
}
