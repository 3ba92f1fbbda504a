use radix_dispatch::{
	handler_fn,
	hyper::{Body, Server},
	HttpRouter, PathParams, Request, Response, ResponseBuilder, RouterBuilder,
};

async fn index(_params: PathParams, _req: Request) -> Response {
	Ok(ResponseBuilder::default().body("Welcome!\n".into())?)
}

async fn hello(params: PathParams, _req: Request) -> Response {
	let body = format!("hello, {}!\n", params.by_name("name"));
	Ok(ResponseBuilder::default().body(body.into())?)
}

async fn files(params: PathParams, _req: Request) -> Response {
	tracing::info!(?params, "serving file");
	let body = format!("file: {}\n", params.by_name("filepath"));
	Ok(ResponseBuilder::default().body(body.into())?)
}

async fn create_item(params: PathParams, _req: Request) -> Response {
	Ok(ResponseBuilder::default()
		.status(201)
		.body(format!("created {}\n", params.by_name("id")).into())?)
}

async fn broken(_params: PathParams, _req: Request) -> Response {
	anyhow::bail!("this route always fails")
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt::init();

	let addr = ([127, 0, 0, 1], 3000).into();

	let mut builder = RouterBuilder::default();
	builder
		.get("/", handler_fn(index))
		.get("/hello/:name", handler_fn(hello))
		.get("/files/*filepath", handler_fn(files))
		.post("/items/:id", handler_fn(create_item))
		.get("/broken", handler_fn(broken));

	let router = HttpRouter::from(builder.build());

	// Routes can still be added once the server holds the router.
	router
		.router()
		.handle("GET", "/health", handler_fn(|_, _| async { Ok(hyper_ok()) }));

	let server = Server::bind(&addr).serve(router);
	tracing::info!(%addr, "listening");

	server.await?;
	Ok(())
}

fn hyper_ok() -> radix_dispatch::hyper::Response<Body> {
	radix_dispatch::hyper::Response::new(Body::from("ok\n"))
}
