use rudiment::listener::{Console, Listener, Spreader, XmlReport};
use rudiment::run::Bootstrap;
use rudiment::{Config, Result};

/// Prepares the environment of the bundled samples.
#[derive(Copy, Clone, Debug, Default)]
pub struct SampleBootstrap;

impl Bootstrap for SampleBootstrap {
    fn listener(&mut self, config: &Config) -> Box<dyn Listener> {
        // More listeners can be appended to the spreader.
        let spreader = Spreader::default().with(Console::new().colors(config.colors));

        match config.xml_report {
            Some(ref path) => Box::new(spreader.with(XmlReport::new(path.clone()))),
            None => Box::new(spreader),
        }
    }

    fn set_up(&mut self) -> Result<()> {
        info!("initializing the sample test environment");
        Ok(())
    }
}
