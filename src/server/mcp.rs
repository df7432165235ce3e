use crate::app::dto::*;
use crate::app::service::LensService;
use rmcp::{
    Json, ServerHandler, ServiceExt, handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters, model::*, tool, tool_handler, tool_router,
    transport::stdio,
};

#[derive(Clone)]
pub struct LensMcpServer {
    service: LensService,
    tool_router: ToolRouter<Self>,
}

impl LensMcpServer {
    pub fn new(service: LensService) -> Self {
        Self {
            service,
            tool_router: Self::tool_router(),
        }
    }

    pub async fn serve_stdio(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        service.waiting().await?;
        Ok(())
    }
}

#[tool_router]
impl LensMcpServer {
    #[tool(
        description = "Scan a Go file for interface declarations and return one impls lens per method."
    )]
    async fn scan_interfaces(
        &self,
        params: Parameters<ScanRequest>,
    ) -> Result<Json<ScanResponse>, String> {
        self.service
            .scan(params.0)
            .await
            .map(Json)
            .map_err(|e| format!("{e:#}"))
    }

    #[tool(
        description = "Locate the main package and its .env file, rewrite loopback hosts for container access and return the debug launch configuration."
    )]
    async fn plan_debug_launch(
        &self,
        params: Parameters<LaunchPlanRequest>,
    ) -> Result<Json<LaunchPlanResponse>, String> {
        self.service
            .plan_launch(params.0)
            .await
            .map(|plan| Json(plan.into()))
            .map_err(|e| format!("{e:#}"))
    }
}

#[tool_handler]
impl ServerHandler for LensMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Find Go interface methods (impls lenses) and prepare container-aware debug launches."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
