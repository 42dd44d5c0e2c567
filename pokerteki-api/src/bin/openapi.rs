/*
    Copyright 2025 MydriaTech AB

    Licensed under the Apache License 2.0 with Free world makers exception
    1.0.0 (the "License"); you may not use this file except in compliance with
    the License. You should have obtained a copy of the License with the source
    or binary distribution in file named

        LICENSE-Apache-2.0-with-FWM-Exception-1.0.0

    Unless required by applicable law or agreed to in writing, software
    distributed under the License is distributed on an "AS IS" BASIS,
    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
    See the License for the specific language governing permissions and
    limitations under the License.
*/

//! Print the OpenAPI description of the REST API.

use std::process::ExitCode;

/// Print the OpenAPI description as pretty JSON to stdout.
fn main() -> ExitCode {
    match pokerteki_api::rest_api::openapi_as_string() {
        Ok(openapi) => {
            println!("{openapi}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Failed to serialize OpenAPI description: {e}");
            ExitCode::FAILURE
        }
    }
}
