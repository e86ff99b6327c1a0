// MCP (Model Context Protocol) server for the Freispace analytics API.
// Exposes read-only query tools to agent clients over stdio.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::McpServer;
