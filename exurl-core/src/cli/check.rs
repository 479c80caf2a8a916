use crate::config::ExurlConfig;
use std::path::Path;

pub fn check(path: &Path) -> anyhow::Result<()> {
    let cfg = ExurlConfig::from_file(path)?;

    println!("✔ Config loaded successfully");
    println!("✔ listening on {}", cfg.server.listen);
    println!(
        "✔ tls {}",
        if cfg.server.tls.is_some() { "enabled" } else { "disabled" }
    );
    println!("✔ up to {} upstream requests per resolution", cfg.upstream.max_hops);
    println!(
        "✔ {} trusted proxies",
        cfg.identity.parsed_trusted_proxies()?.len()
    );
    println!(
        "✔ geoip {}",
        match (&cfg.identity.geoip_city_db, &cfg.identity.geoip_asn_db) {
            (None, None) => "disabled",
            (Some(_), Some(_)) => "city + asn",
            (Some(_), None) => "city only",
            (None, Some(_)) => "asn only",
        }
    );

    Ok(())
}
