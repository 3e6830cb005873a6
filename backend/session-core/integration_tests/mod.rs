mod helpers;
mod http_transport;
mod session_flow;
