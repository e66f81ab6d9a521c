use openapi_zod_core::{
    compile_yaml, BaseKind, CompilerOptions, HttpMethod, Modifier, ParamLocation, PrimitiveKind,
    RequestFormat, ResponseStatus, ValidationExpr, WarningKind,
};
use pretty_assertions::assert_eq;

const PETSTORE: &str = r#"
openapi: 3.0.3
info:
  title: Petstore
  version: 1.0.0
paths:
  /pets:
    get:
      summary: List pets
      parameters:
        - name: limit
          in: query
          schema:
            type: integer
            maximum: 100
      responses:
        '200':
          description: A page of pets
          content:
            application/json:
              schema:
                type: array
                items:
                  $ref: '#/components/schemas/Pet'
        default:
          $ref: '#/components/responses/Problem'
    post:
      operationId: createPet
      requestBody:
        required: true
        content:
          application/x-www-form-urlencoded:
            schema:
              $ref: '#/components/schemas/NewPet'
      responses:
        '201':
          description: Created
        '422':
          description: Invalid
          content:
            application/problem+json:
              schema:
                $ref: '#/components/schemas/Error'
  /pets/{petId}/photos/{photoId}:
    parameters:
      - name: petId
        in: path
        description: shared
        schema:
          type: string
    get:
      deprecated: true
      parameters:
        - name: petId
          in: path
          required: true
          description: overridden
          schema:
            type: string
            format: uuid
      responses:
        '404':
          description: Not found
        '2XX':
          description: Photo
          content:
            image/png:
              schema:
                type: string
                format: binary
components:
  schemas:
    Pet:
      type: object
      required: [id, name]
      properties:
        id:
          type: integer
        name:
          type: string
    NewPet:
      type: object
      properties:
        name:
          type: string
    Error:
      type: object
      properties:
        message:
          type: string
  responses:
    Problem:
      description: Unexpected error
      content:
        application/json:
          schema:
            $ref: '#/components/schemas/Error'
"#;

#[test]
fn test_endpoints_in_document_order() {
    let compiled = compile_yaml(PETSTORE, &CompilerOptions::default()).unwrap();
    let routes: Vec<_> = compiled
        .endpoints
        .iter()
        .map(|e| (e.method, e.path.as_str(), e.alias.as_deref()))
        .collect();
    assert_eq!(
        routes,
        vec![
            (HttpMethod::Get, "/pets", Some("getPets")),
            (HttpMethod::Post, "/pets", Some("createPet")),
            (
                HttpMethod::Get,
                "/pets/{petId}/photos/{photoId}",
                Some("getPetsPetIdPhotosPhotoId")
            ),
        ]
    );
}

#[test]
fn test_list_endpoint() {
    let compiled = compile_yaml(PETSTORE, &CompilerOptions::default()).unwrap();
    let list = &compiled.endpoints[0];

    assert_eq!(list.description.as_deref(), Some("List pets"));
    assert_eq!(list.request_format, RequestFormat::Json);
    assert_eq!(
        list.response,
        ValidationExpr::new(BaseKind::Array {
            items: Box::new(ValidationExpr::named_ref("Pet")),
        })
    );

    assert_eq!(list.parameters.len(), 1);
    assert_eq!(list.parameters[0].location, ParamLocation::Query);
    assert_eq!(
        list.parameters[0].schema.modifiers,
        vec![
            Modifier::Integer,
            Modifier::Max(100.into()),
            Modifier::Optional
        ]
    );

    assert_eq!(list.errors.len(), 1);
    assert_eq!(list.errors[0].status, ResponseStatus::Default);
    assert_eq!(list.errors[0].description.as_deref(), Some("Unexpected error"));
    assert_eq!(list.errors[0].schema, ValidationExpr::named_ref("Error"));
}

#[test]
fn test_create_endpoint_body() {
    let compiled = compile_yaml(PETSTORE, &CompilerOptions::default()).unwrap();
    let create = &compiled.endpoints[1];

    assert_eq!(create.request_format, RequestFormat::FormUrl);
    assert_eq!(create.parameters[0].name, "body");
    assert_eq!(create.parameters[0].location, ParamLocation::Body);
    assert_eq!(create.parameters[0].schema, ValidationExpr::named_ref("NewPet"));
    assert_eq!(create.response, ValidationExpr::primitive(PrimitiveKind::Void));
    assert_eq!(create.errors[0].status, ResponseStatus::Code(422));
    assert_eq!(create.errors[0].schema, ValidationExpr::named_ref("Error"));
}

#[test]
fn test_path_level_parameters_and_range_success() {
    let compiled = compile_yaml(PETSTORE, &CompilerOptions::default()).unwrap();
    let photo = &compiled.endpoints[2];

    assert!(photo.deprecated);
    assert_eq!(photo.parameters.len(), 1);
    assert_eq!(photo.parameters[0].description.as_deref(), Some("overridden"));
    assert!(!photo.parameters[0].schema.is_optional());
    assert_eq!(
        photo.response,
        ValidationExpr::primitive(PrimitiveKind::String)
    );
    assert_eq!(photo.errors[0].status, ResponseStatus::Code(404));

    let undeclared: Vec<_> = compiled
        .warnings
        .iter()
        .filter(|w| w.kind == WarningKind::UndeclaredPathParameter)
        .collect();
    assert_eq!(undeclared.len(), 1);
    assert!(undeclared[0].message.contains("photoId"));
}

#[test]
fn test_shared_translation_cache() {
    let compiled = compile_yaml(PETSTORE, &CompilerOptions::default()).unwrap();
    let names: Vec<_> = compiled
        .declarations
        .iter()
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(names, vec!["Pet", "NewPet", "Error"]);
}

#[test]
fn test_json_shape_of_endpoint() {
    let compiled = compile_yaml(PETSTORE, &CompilerOptions::default()).unwrap();
    let value = serde_json::to_value(&compiled.endpoints[1]).unwrap();
    assert_eq!(value["method"], "post");
    assert_eq!(value["requestFormat"], "form-url");
    assert_eq!(value["parameters"][0]["location"], "body");
    assert_eq!(value["response"]["primitive"], "void");
    assert_eq!(value["errors"][0]["status"], 422);
    assert!(value.get("deprecated").is_none());
}
