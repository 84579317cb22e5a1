use std::time::Duration;

use tracing::{debug, info};
use ureq::{Agent, Proxy};

use crate::config::Config;
use crate::errors::Error;
use crate::readers;
use crate::record::BusinessRecord;


pub const URL: &str = "https://wwwinfo.mfcr.cz/cgi-bin/ares/darv_bas.cgi";


/// Query parameters requesting the basic answer for an identification number,
/// including entities that are no longer active
pub fn query(identifier: &str) -> [(&'static str, &str); 2] {
    [("ico", identifier), ("aktivni", "false")]
}


/// Fetches the raw registry answer for an identification number
pub trait Transport {
    fn fetch(&self, identifier: &str) -> Result<Vec<u8>, Error>;
}


pub struct HttpTransport {
    agent: Agent,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &Config) -> Result<HttpTransport, Error> {
        let mut builder = Agent::config_builder().timeout_global(config.timeout.map(Duration::from_secs));

        if let Some(proxy) = &config.proxy {
            builder = builder.proxy(Some(Proxy::new(proxy)?));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }

        Ok(HttpTransport {
            agent: builder.build().into(),
            url: config.url.clone(),
        })
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, identifier: &str) -> Result<Vec<u8>, Error> {
        info!(url = self.url, identifier, "Requesting registry answer");

        let request = query(identifier)
            .into_iter()
            .fold(self.agent.get(self.url.as_str()), |request, (key, value)| request.query(key, value));

        let mut response = request.call()?;
        let body = response.body_mut().read_to_vec()?;

        debug!(status = response.status().as_u16(), bytes = body.len(), "Received registry answer");
        Ok(body)
    }
}


/// Client of the business registry. Records are returned to the caller and never kept.
pub struct Ares<T = HttpTransport> {
    transport: T,
}

impl Ares<HttpTransport> {
    pub fn new(config: &Config) -> Result<Ares<HttpTransport>, Error> {
        Ok(Ares {
            transport: HttpTransport::new(config)?,
        })
    }
}

impl<T: Transport> Ares<T> {
    pub fn with_transport(transport: T) -> Ares<T> {
        Ares { transport }
    }

    /// Load fresh data for the identification number
    pub fn load_data(&self, identifier: &str) -> Result<BusinessRecord, Error> {
        let body = self.transport.fetch(identifier)?;
        readers::parse(&body, identifier)
    }
}
