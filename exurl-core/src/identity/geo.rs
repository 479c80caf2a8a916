use anyhow::Context;
use maxminddb::PathElement;
use std::net::IpAddr;
use std::path::Path;

/// Network metadata for one address. Every field is best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    pub country: Option<String>,
    pub city: Option<String>,
    pub continent: Option<String>,
    pub asn: Option<u32>,
    pub as_organization: Option<String>,
}

/// Optional MaxMind readers. Without databases every lookup is empty.
#[derive(Default)]
pub struct GeoLookup {
    city_reader: Option<maxminddb::Reader<maxminddb::Mmap>>,
    asn_reader: Option<maxminddb::Reader<maxminddb::Mmap>>,
}

impl GeoLookup {
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn open(city_db: Option<&Path>, asn_db: Option<&Path>) -> anyhow::Result<Self> {
        Ok(Self {
            city_reader: city_db.map(open_mmdb).transpose()?,
            asn_reader: asn_db.map(open_mmdb).transpose()?,
        })
    }

    pub fn is_enabled(&self) -> bool {
        self.city_reader.is_some() || self.asn_reader.is_some()
    }

    pub fn lookup(&self, ip: IpAddr) -> GeoInfo {
        let mut geo = GeoInfo::default();

        //---------------------------------------------------------------------
        // Country, city and continent
        //---------------------------------------------------------------------
        let lookup = self
            .city_reader
            .as_ref()
            .and_then(|reader| reader.lookup(ip).ok());

        if let Some(lookup) = lookup {
            geo.country = lookup
                .decode_path::<String>(&[PathElement::Key("country"), PathElement::Key("iso_code")])
                .ok()
                .flatten();

            geo.city = lookup
                .decode_path::<String>(&[
                    PathElement::Key("city"),
                    PathElement::Key("names"),
                    PathElement::Key("en"),
                ])
                .ok()
                .flatten();

            geo.continent = lookup
                .decode_path::<String>(&[PathElement::Key("continent"), PathElement::Key("code")])
                .ok()
                .flatten();
        }

        //---------------------------------------------------------------------
        // ASN
        //---------------------------------------------------------------------
        let lookup = self
            .asn_reader
            .as_ref()
            .and_then(|reader| reader.lookup(ip).ok());

        if let Some(lookup) = lookup {
            geo.asn = lookup
                .decode_path::<u32>(&[PathElement::Key("autonomous_system_number")])
                .ok()
                .flatten();

            geo.as_organization = lookup
                .decode_path::<String>(&[PathElement::Key("autonomous_system_organization")])
                .ok()
                .flatten();
        }

        geo
    }
}

fn open_mmdb(path: &Path) -> anyhow::Result<maxminddb::Reader<maxminddb::Mmap>> {
    // Safety: the file is mapped read-only, lives as long as the reader, and
    // exurl never writes to it.
    unsafe { maxminddb::Reader::open_mmap(path) }
        .with_context(|| format!("failed to open GeoIP database {}", path.display()))
}
