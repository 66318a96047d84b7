//! Generate the static posts listing

use anyhow::Result;

use crate::generator::Generator;
use crate::Site;

/// Fetch content from the CMS and write `{public_dir}/{posts_dir}/index.html`
pub async fn run(site: &Site) -> Result<()> {
    let start = std::time::Instant::now();

    let client = site.client()?;
    let generator = Generator::new(site)?;
    let output_path = generator.generate(&client).await?;

    tracing::info!("Generated {:?}", output_path);
    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
