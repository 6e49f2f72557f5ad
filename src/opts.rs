//! Connection options.

use no_panic::no_panic;
use url::Url;

use crate::error::Error;

/// Options for a packet connection and the cursors opened on it.
#[derive(Debug, Clone)]
pub struct Opts {
    /// Number of rows requested per COM_STMT_FETCH round-trip.
    ///
    /// Must be positive.
    ///
    /// Default: `128`
    pub fetch_size: u32,

    /// Largest packet payload the connection will build.
    ///
    /// A write buffer larger than this cannot be taken.
    ///
    /// Default: `64 MiB`
    pub max_allowed_packet: usize,

    /// Additional connection parameters.
    ///
    /// Default: `[]`
    pub params: Vec<(String, String)>,
}

impl Default for Opts {
    #[no_panic]
    fn default() -> Self {
        Self {
            fetch_size: 128,
            max_allowed_packet: 64 << 20,
            params: Vec::new(),
        }
    }
}

impl TryFrom<&Url> for Opts {
    type Error = Error;

    /// Parse options from a MySQL connection URL.
    ///
    /// Format: `mysql://[user[:password]@]host[:port][/database][?param1=value1&..]`
    ///
    /// Only the query string is interpreted. Supported parameters:
    /// - `fetch_size`: rows per fetch round-trip (positive integer)
    /// - `max_allowed_packet`: maximum packet payload in bytes (positive integer)
    fn try_from(url: &Url) -> Result<Self, Self::Error> {
        if url.scheme() != "mysql" {
            return Err(Error::InvalidUsage(format!(
                "Invalid scheme: expected 'mysql://', got '{}://'",
                url.scheme()
            )));
        }

        let mut opts = Opts::default();

        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "fetch_size" => {
                    opts.fetch_size = match value.parse::<u32>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(Error::InvalidUsage(format!(
                                "Invalid fetch_size: {}",
                                value
                            )));
                        }
                    };
                }
                "max_allowed_packet" => {
                    opts.max_allowed_packet = match value.parse::<usize>() {
                        Ok(n) if n > 0 => n,
                        _ => {
                            return Err(Error::InvalidUsage(format!(
                                "Invalid max_allowed_packet: {}",
                                value
                            )));
                        }
                    };
                }
                _ => {
                    opts.params.push((key.to_string(), value.to_string()));
                }
            }
        }

        Ok(opts)
    }
}

impl TryFrom<&str> for Opts {
    type Error = Error;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let url = Url::parse(s).map_err(|e| Error::InvalidUsage(format!("Invalid URL: {}", e)))?;
        Self::try_from(&url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Opts::default();
        assert_eq!(opts.fetch_size, 128);
        assert_eq!(opts.max_allowed_packet, 64 * 1024 * 1024);
        assert!(opts.params.is_empty());
    }

    #[test]
    fn test_parse_url() {
        let opts = Opts::try_from(
            "mysql://root:pw@localhost:3306/app?fetch_size=10&max_allowed_packet=1024&charset=utf8mb4",
        )
        .unwrap();
        assert_eq!(opts.fetch_size, 10);
        assert_eq!(opts.max_allowed_packet, 1024);
        assert_eq!(
            opts.params,
            vec![("charset".to_string(), "utf8mb4".to_string())]
        );
    }

    #[test]
    fn test_reject_zero_fetch_size() {
        let err = Opts::try_from("mysql://localhost/?fetch_size=0").unwrap_err();
        assert!(matches!(err, Error::InvalidUsage(_)));
    }

    #[test]
    fn test_reject_scheme() {
        let err = Opts::try_from("postgres://localhost/db").unwrap_err();
        assert!(matches!(err, Error::InvalidUsage(_)));
    }
}
