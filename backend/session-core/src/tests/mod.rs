mod router;
mod routes;
mod session;
mod support;
