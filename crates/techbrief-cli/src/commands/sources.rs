use anyhow::Result;

use techbrief_core::feed::{default_sources, group_by_category};

pub fn run() -> Result<()> {
    let sources = default_sources();

    println!("Sources ({}):\n", sources.len());

    for (category, members) in group_by_category(&sources) {
        println!("{}", category.label());
        for source in members {
            println!("  {}", source.name);
            println!("    URL: {}", source.url);
        }
        println!();
    }

    Ok(())
}
