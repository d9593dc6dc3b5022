//! Dealership schema: customers, sellers, vehicles (keyed by VIN) and sales.

use crate::schema::{EntityDescriptor, FieldDescriptor, Identifier, SchemaBinding};

pub const VIN_LEN: usize = 17;

pub static CLIENTE: EntityDescriptor = EntityDescriptor {
    name: "Cliente",
    resource: "clientes_automoviles",
    binding: SchemaBinding::Automoviles,
    table: "cliente",
    identifier: Identifier::Serial { column: "id_cliente" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::text("direccion", "Dirección", 255),
        FieldDescriptor::email("correo_electronico", "Correo Electrónico", 100).unique(),
        FieldDescriptor::text("telefono", "Teléfono", 15),
    ],
};

pub static VENDEDOR: EntityDescriptor = EntityDescriptor {
    name: "Vendedor",
    resource: "vendedores",
    binding: SchemaBinding::Automoviles,
    table: "vendedor",
    identifier: Identifier::Serial { column: "id_vendedor" },
    fields: &[
        FieldDescriptor::text("nombre", "Nombre", 100),
        FieldDescriptor::text("direccion", "Dirección", 255),
        FieldDescriptor::text("telefono", "Teléfono", 15),
        FieldDescriptor::datetime("fecha_contratacion", "Fecha de Contratación"),
    ],
};

pub static VEHICULO: EntityDescriptor = EntityDescriptor {
    name: "Vehículo",
    resource: "vehiculos",
    binding: SchemaBinding::Automoviles,
    table: "vehiculo",
    identifier: Identifier::Natural { field: "vin", len: VIN_LEN },
    fields: &[
        FieldDescriptor::text("vin", "VIN", VIN_LEN as u32),
        FieldDescriptor::text("marca", "Marca", 50),
        FieldDescriptor::text("modelo", "Modelo", 50),
        FieldDescriptor::integer("anio", "Año"),
        FieldDescriptor::text("color", "Color", 20),
        FieldDescriptor::text("tipo", "Tipo", 50),
        FieldDescriptor::decimal("precio", "Precio", 10, 2),
        FieldDescriptor::datetime("fecha_recepcion", "Fecha de Recepción"),
    ],
};

pub static VENTA: EntityDescriptor = EntityDescriptor {
    name: "Venta",
    resource: "ventas",
    binding: SchemaBinding::Automoviles,
    table: "venta",
    identifier: Identifier::Serial { column: "id_venta" },
    fields: &[
        FieldDescriptor::integer("id_cliente", "ID Cliente").references("cliente", "id_cliente"),
        FieldDescriptor::integer("id_vendedor", "ID Vendedor").references("vendedor", "id_vendedor"),
        FieldDescriptor::text("vin", "VIN", VIN_LEN as u32).references("vehiculo", "vin"),
        FieldDescriptor::datetime("fecha", "Fecha"),
        FieldDescriptor::decimal("precio", "Precio", 10, 2),
    ],
};

pub static ENTITIES: [&EntityDescriptor; 4] = [&CLIENTE, &VENDEDOR, &VEHICULO, &VENTA];
