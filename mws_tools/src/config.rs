use std::{fmt::Display, str::FromStr};

use log::*;
use mon_common::{parse_comma_list, Secret};

use crate::MwsApiError;

/// The MWS endpoint regions. Each region is served by its own host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MwsRegion {
    #[default]
    NorthAmerica,
    Canada,
    Mexico,
    Brazil,
    Europe,
    UnitedKingdom,
    India,
    Japan,
    Australia,
    China,
}

impl MwsRegion {
    pub fn host(&self) -> &'static str {
        match self {
            Self::NorthAmerica | Self::Brazil => "mws.amazonservices.com",
            Self::Canada => "mws.amazonservices.ca",
            Self::Mexico => "mws.amazonservices.com.mx",
            Self::Europe | Self::UnitedKingdom => "mws-eu.amazonservices.com",
            Self::India => "mws.amazonservices.in",
            Self::Japan => "mws.amazonservices.jp",
            Self::Australia => "mws.amazonservices.com.au",
            Self::China => "mws.amazonservices.com.cn",
        }
    }
}

impl FromStr for MwsRegion {
    type Err = MwsApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "NA" | "US" => Ok(Self::NorthAmerica),
            "CA" => Ok(Self::Canada),
            "MX" => Ok(Self::Mexico),
            "BR" => Ok(Self::Brazil),
            "EU" | "DE" | "FR" | "IT" | "ES" => Ok(Self::Europe),
            "UK" | "GB" => Ok(Self::UnitedKingdom),
            "IN" => Ok(Self::India),
            "JP" | "FE" => Ok(Self::Japan),
            "AU" => Ok(Self::Australia),
            "CN" => Ok(Self::China),
            other => Err(MwsApiError::ConfigurationError(format!("{other} is not a known MWS region"))),
        }
    }
}

impl Display for MwsRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            Self::NorthAmerica => "NA",
            Self::Canada => "CA",
            Self::Mexico => "MX",
            Self::Brazil => "BR",
            Self::Europe => "EU",
            Self::UnitedKingdom => "UK",
            Self::India => "IN",
            Self::Japan => "JP",
            Self::Australia => "AU",
            Self::China => "CN",
        };
        f.write_str(code)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MwsConfig {
    pub access_key: String,
    pub secret_key: Secret<String>,
    pub seller_id: String,
    pub region: MwsRegion,
    pub marketplace_ids: Vec<String>,
    /// Overrides the region's endpoint, e.g. `http://localhost:8080` for a gateway or a local stand-in.
    pub endpoint: Option<String>,
}

impl MwsConfig {
    pub fn new_from_env_or_default() -> Self {
        let access_key = std::env::var("MON_MWS_ACCESS_KEY").unwrap_or_else(|_| {
            warn!("MON_MWS_ACCESS_KEY not set, using (probably useless) default");
            "AKIA00000000000000".to_string()
        });
        let secret_key = Secret::new(std::env::var("MON_MWS_SECRET_KEY").unwrap_or_else(|_| {
            warn!("MON_MWS_SECRET_KEY not set, using (probably useless) default");
            "00000000000000".to_string()
        }));
        let seller_id = std::env::var("MON_MWS_SELLER_ID").unwrap_or_else(|_| {
            warn!("MON_MWS_SELLER_ID not set, using (probably useless) default");
            "A000000000000".to_string()
        });
        let region = std::env::var("MON_MWS_REGION")
            .map_err(|_| warn!("MON_MWS_REGION not set, using NA as default"))
            .and_then(|s| s.parse::<MwsRegion>().map_err(|e| warn!("Invalid MON_MWS_REGION. {e}. Using NA instead.")))
            .unwrap_or_default();
        let marketplace_ids =
            std::env::var("MON_MWS_MARKETPLACE_IDS").map(|s| parse_comma_list(&s)).unwrap_or_else(|_| {
                error!(
                    "MON_MWS_MARKETPLACE_IDS not set. No orders will be fetched until at least one marketplace is \
                     configured."
                );
                Vec::new()
            });
        let endpoint = std::env::var("MON_MWS_ENDPOINT").ok().filter(|s| !s.trim().is_empty());
        Self { access_key, secret_key, seller_id, region, marketplace_ids, endpoint }
    }

    /// The base URL that requests are sent to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}", self.region.host()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn region_codes() {
        assert_eq!("na".parse::<MwsRegion>().unwrap(), MwsRegion::NorthAmerica);
        assert_eq!("UK".parse::<MwsRegion>().unwrap(), MwsRegion::UnitedKingdom);
        assert_eq!(" jp ".parse::<MwsRegion>().unwrap(), MwsRegion::Japan);
        assert!("Atlantis".parse::<MwsRegion>().is_err());
        assert_eq!(MwsRegion::Europe.host(), "mws-eu.amazonservices.com");
        assert_eq!(MwsRegion::UnitedKingdom.to_string(), "UK");
    }

    #[test]
    fn endpoint_override() {
        let mut config = MwsConfig::default();
        assert_eq!(config.endpoint_url(), "https://mws.amazonservices.com");
        config.region = MwsRegion::Canada;
        assert_eq!(config.endpoint_url(), "https://mws.amazonservices.ca");
        config.endpoint = Some("http://localhost:8080/".into());
        assert_eq!(config.endpoint_url(), "http://localhost:8080");
    }
}
