//! Banners shown when the shell starts and stops.

use std::io::{Result, Write};

/// Moves the cursor home and clears the screen.
pub const CLEAR_SCREEN: &str = "\x1b[H\x1b[J";

const WELCOME: &str = r"
       _          _               _
    __| |_      _(_)_ __ ___  ___| |__
   / _` \ \ /\ / / | '_ ` _ \/ __| '_ \
  | (_| |\ V  V /| | | | | | \__ \ | | |
   \__,_| \_/\_/ |_|_| |_| |_|___/_| |_|

        Bienvenido a dwimsh
";

const GOODBYE: &str = "
        ¡Gracias por usar dwimsh! ¡Hasta la próxima!
                   ¡Que tengas un excelente día!

";

/// Output produced at the edges of a session.
///
/// The dispatch loop calls [`Presentation::startup`] once before the first
/// prompt and [`Presentation::shutdown`] once on every exit path.
pub trait Presentation {
    fn startup(&mut self, out: &mut dyn Write) -> Result<()>;

    fn shutdown(&mut self, out: &mut dyn Write) -> Result<()>;
}

/// Welcome and goodbye banners for an interactive terminal.
#[derive(Debug, Default)]
pub struct Banner;

impl Presentation for Banner {
    fn startup(&mut self, out: &mut dyn Write) -> Result<()> {
        out.write_all(WELCOME.as_bytes())?;
        out.flush()
    }

    fn shutdown(&mut self, out: &mut dyn Write) -> Result<()> {
        out.write_all(CLEAR_SCREEN.as_bytes())?;
        out.write_all(GOODBYE.as_bytes())?;
        out.flush()
    }
}

/// Prints nothing.
#[derive(Debug, Default)]
pub struct Quiet;

impl Presentation for Quiet {
    fn startup(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }

    fn shutdown(&mut self, _out: &mut dyn Write) -> Result<()> {
        Ok(())
    }
}
