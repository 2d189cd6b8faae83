//! Typed RPC over HTTP/2 surface — spec.md §6. No teacher analog; built
//! from the standard `tonic`/`prost` service pattern with reflection and a
//! health sub-service, since the method set and error taxonomy must match
//! the HTTP surface exactly (see [`super::http`]).

use super::facade::{CreateBuildRequest as FacadeCreateBuild, CreateRuleRequest as FacadeCreateRule, ServiceFacade};
use crate::error::CoreError;
use std::sync::Arc;
use tonic::{Request, Response, Status};

pub mod pb {
    tonic::include_proto!("ninjagraph.v1");

    pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("ninjagraph_descriptor");
}

use pb::ninja_graph_server::{NinjaGraph, NinjaGraphServer};
use pb::*;

pub struct RpcService {
    facade: Arc<ServiceFacade>,
}

impl RpcService {
    pub fn new(facade: Arc<ServiceFacade>) -> Self {
        RpcService { facade }
    }

    pub fn into_server(self) -> NinjaGraphServer<Self> {
        NinjaGraphServer::new(self)
    }
}

/// Maps a core error onto a `tonic::Status`, per spec.md §7.
fn to_status(err: CoreError) -> Status {
    match err {
        CoreError::InvalidArgument(msg) => Status::invalid_argument(msg),
        CoreError::NotFound(msg) => Status::not_found(msg),
        CoreError::ParseError(msg) => Status::failed_precondition(msg),
        CoreError::StoreUnavailable(msg) => Status::internal(msg),
        CoreError::CycleDetected(_) => Status::failed_precondition(err.to_string()),
        CoreError::SerializationError(msg) => Status::internal(msg),
    }
}

fn target_record(t: &crate::graph::Target) -> TargetRecord {
    TargetRecord {
        path: t.path.clone(),
        status: t.status.clone(),
        hash: t.hash.clone(),
        build: t.build.clone(),
    }
}

#[tonic::async_trait]
impl NinjaGraph for RpcService {
    async fn health(&self, _req: Request<HealthRequest>) -> Result<Response<HealthResponse>, Status> {
        let info = self.facade.health();
        Ok(Response::new(HealthResponse {
            status: info.status.to_string(),
            timestamp: info.timestamp,
        }))
    }

    async fn status(&self, _req: Request<StatusRequest>) -> Result<Response<StatusResponse>, Status> {
        let info = self.facade.status();
        Ok(Response::new(StatusResponse {
            service: info.service.to_string(),
            uptime_secs: info.uptime_secs,
        }))
    }

    async fn create_build(
        &self,
        req: Request<CreateBuildRequest>,
    ) -> Result<Response<CreateBuildResponse>, Status> {
        let body = req.into_inner();
        let build = self
            .facade
            .create_build(FacadeCreateBuild {
                build_id: body.build_id,
                rule: body.rule,
                variables: body.variables,
                pool: body.pool,
                inputs: body.inputs,
                outputs: body.outputs,
                implicit_deps: body.implicit_deps,
                order_deps: body.order_deps,
            })
            .map_err(to_status)?;
        Ok(Response::new(CreateBuildResponse {
            status: "created".to_string(),
            build_id: build.build_id,
        }))
    }

    async fn get_build(&self, req: Request<GetBuildRequest>) -> Result<Response<BuildRecord>, Status> {
        let build = self.facade.get_build(&req.into_inner().build_id).map_err(to_status)?;
        Ok(Response::new(BuildRecord {
            build_id: build.build_id,
            rule: build.rule,
            pool: build.pool,
            variables: build.variables,
        }))
    }

    async fn get_build_stats(&self, _req: Request<GetBuildStatsRequest>) -> Result<Response<BuildStats>, Status> {
        let stats = self.facade.get_build_stats().map_err(to_status)?;
        Ok(Response::new(BuildStats {
            rules: stats.rules as u64,
            files: stats.files as u64,
            targets: stats.targets as u64,
            builds: stats.builds as u64,
        }))
    }

    async fn get_build_order(
        &self,
        _req: Request<GetBuildOrderRequest>,
    ) -> Result<Response<BuildOrderResponse>, Status> {
        let order = self.facade.get_build_order().map_err(to_status)?;
        Ok(Response::new(BuildOrderResponse { build_order: order }))
    }

    async fn create_rule(&self, req: Request<CreateRuleRequest>) -> Result<Response<CreateRuleResponse>, Status> {
        let body = req.into_inner();
        let rule = self
            .facade
            .create_rule(FacadeCreateRule {
                name: body.name,
                command: body.command,
                description: body.description,
                variables: body.variables,
            })
            .map_err(to_status)?;
        Ok(Response::new(CreateRuleResponse {
            status: "created".to_string(),
            name: rule.name,
        }))
    }

    async fn get_rule(&self, req: Request<GetRuleRequest>) -> Result<Response<RuleRecord>, Status> {
        let rule = self.facade.get_rule(&req.into_inner().name).map_err(to_status)?;
        Ok(Response::new(RuleRecord {
            name: rule.name,
            command: rule.command,
            description: rule.description,
            variables: rule.variables,
        }))
    }

    async fn get_targets_by_rule(
        &self,
        req: Request<GetTargetsByRuleRequest>,
    ) -> Result<Response<TargetList>, Status> {
        let targets = self
            .facade
            .get_targets_by_rule(&req.into_inner().rule_name)
            .map_err(to_status)?;
        Ok(Response::new(TargetList {
            targets: targets.iter().map(target_record).collect(),
        }))
    }

    async fn get_all_targets(&self, _req: Request<GetAllTargetsRequest>) -> Result<Response<TargetList>, Status> {
        let targets = self.facade.get_all_targets().map_err(to_status)?;
        Ok(Response::new(TargetList {
            targets: targets.iter().map(target_record).collect(),
        }))
    }

    async fn get_target(&self, req: Request<GetTargetRequest>) -> Result<Response<TargetRecord>, Status> {
        let target = self.facade.get_target(&req.into_inner().path).map_err(to_status)?;
        Ok(Response::new(target_record(&target)))
    }

    async fn get_target_dependencies(&self, req: Request<GetTargetRequest>) -> Result<Response<FileList>, Status> {
        let files = self
            .facade
            .get_target_dependencies(&req.into_inner().path)
            .map_err(to_status)?;
        Ok(Response::new(FileList {
            files: files
                .iter()
                .map(|f| FileRecord {
                    path: f.path.clone(),
                    file_type: f.file_type.as_str().to_string(),
                })
                .collect(),
        }))
    }

    async fn get_target_reverse_dependencies(
        &self,
        req: Request<GetTargetRequest>,
    ) -> Result<Response<TargetList>, Status> {
        let targets = self
            .facade
            .get_target_reverse_dependencies(&req.into_inner().path)
            .map_err(to_status)?;
        Ok(Response::new(TargetList {
            targets: targets.iter().map(target_record).collect(),
        }))
    }

    async fn update_target_status(
        &self,
        req: Request<UpdateTargetStatusRequest>,
    ) -> Result<Response<UpdateTargetStatusResponse>, Status> {
        let body = req.into_inner();
        self.facade
            .update_target_status(&body.path, &body.status)
            .map_err(to_status)?;
        Ok(Response::new(UpdateTargetStatusResponse {
            status: "updated".to_string(),
        }))
    }

    async fn find_cycles(&self, _req: Request<FindCyclesRequest>) -> Result<Response<FindCyclesResponse>, Status> {
        let cycles = self.facade.find_cycles().map_err(to_status)?;
        Ok(Response::new(FindCyclesResponse {
            cycle_count: cycles.len() as u64,
            cycles: cycles.into_iter().map(|nodes| Cycle { nodes }).collect(),
        }))
    }

    async fn debug_quads(&self, _req: Request<DebugQuadsRequest>) -> Result<Response<DebugQuadsResponse>, Status> {
        let quads = self.facade.debug_quads().map_err(to_status)?;
        Ok(Response::new(DebugQuadsResponse {
            quads: quads
                .into_iter()
                .map(|t| Quad {
                    subject: t.subject,
                    predicate: t.predicate,
                    object: t.object,
                })
                .collect(),
        }))
    }

    async fn load_ninja_file(
        &self,
        req: Request<LoadNinjaFileRequest>,
    ) -> Result<Response<LoadNinjaFileResponse>, Status> {
        let body = req.into_inner();
        let result = self
            .facade
            .load_ninja_file(body.file_path, body.content)
            .map_err(to_status)?;
        Ok(Response::new(LoadNinjaFileResponse {
            status: "success".to_string(),
            message: result.message,
            rules_loaded: result.rules_loaded as u64,
            builds_loaded: result.builds_loaded as u64,
            build_time_secs: result.build_time.as_secs_f64(),
        }))
    }
}

pub fn health_reporter() -> (tonic_health::server::HealthReporter, tonic_health::pb::health_server::HealthServer<impl tonic_health::pb::health_server::Health>) {
    tonic_health::server::health_reporter()
}

pub fn reflection_service() -> tonic_reflection::server::v1::ServerReflectionServer<
    impl tonic_reflection::server::v1::ServerReflection,
> {
    tonic_reflection::server::Builder::configure()
        .register_encoded_file_descriptor_set(pb::FILE_DESCRIPTOR_SET)
        .build_v1()
        .expect("reflection service descriptor set is valid")
}
