// Copyright 2025 Sandlog (https://github.com/sandlog/sandlog)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Sandlog Client
//!
//! Async client for the robot-management service, plus the
//! configuration-at-timestamp resolver built on top of it.
//!
//! ```no_run
//! use sandlog_client::{ClientConfig, RobotServiceClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("http://localhost:9090")
//!         .with_api_key("dev-key");
//!     let client = RobotServiceClient::new(config)?;
//!
//!     match client.config_at_time("part-1", chrono::Utc::now()).await? {
//!         Some(resolved) => println!("{}", resolved.config),
//!         None => println!("no configuration recorded for that time"),
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod resolver;

pub use client::{ClientConfig, ClientError, Result, RobotApi, RobotServiceClient};
pub use resolver::config_at_time;
