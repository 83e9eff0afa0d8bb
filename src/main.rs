/*
 *  main.rs
 *
 *  inkslate - paper that remembers
 *  (c) 2020-26 Stuart Hunter
 *
 *  Command line front end: image mode or interactive text mode
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::io;

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::{debug, info};

use inkslate::build_info::BUILD_DATE;
use inkslate::config::{self, Cli};
use inkslate::display::{DisplayDriverFactory, DisplaySink};
use inkslate::runner::{run_text_session, show_image, with_display, RenderOptions};
use inkslate::text::{MonoFontShaper, TextLayout};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli).context("loading configuration")?;

    let default_level = if cli.debug {
        "debug"
    } else {
        cfg.log_level.as_deref().unwrap_or("info")
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_level))
        .format_timestamp_secs()
        .init();

    if cli.dump_config {
        print!("{}", config::dump(&cfg)?);
        return Ok(());
    }

    info!("{} v.{} built {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), BUILD_DATE);
    debug!("Effective config: {:?}", cfg);

    // bad --rotate must fail before the panel is woken
    let options = RenderOptions::new(!cli.nodither, cli.rotate, cfg.threshold())?;
    let driver = DisplayDriverFactory::create_from_config(&cfg)?;

    with_display(driver, |panel| match cli.image.as_deref() {
        Some(path) => show_image(panel, path, &options),
        None => {
            let shaper = MonoFontShaper::default();
            let layout = TextLayout::for_panel(
                panel.resolution(),
                cfg.margins(),
                cfg.line_spacing(),
                &shaper,
            );
            let stdin = io::stdin();
            let summary = run_text_session(
                panel,
                &shaper,
                layout,
                cfg.min_refresh(),
                stdin.lock(),
                io::stdout(),
            )?;
            debug!("{:?}", summary);
            Ok(())
        }
    })?;

    Ok(())
}
